//! Configuration for memory and file persistence.
//!
//! ```ignore
//! let config: PersistenceConfig = serde_json::from_str(
//!     r#"{ "path": "./data/dummies.json", "options": { "max_page_size": 50 } }"#,
//! )?;
//! persistence.configure(&config);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Page size used when a query does not ask for a specific `take`.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Configuration parameters understood by the persistence components.
///
/// Every key is optional; components keep their current value for keys
/// that are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Location of the JSON data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub options: PersistenceOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceOptions {
    /// Maximum number of items returned in a single page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_page_size: Option<usize>,
}

impl PersistenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.options.max_page_size = Some(max_page_size);
        self
    }
}

/// Components that can be reconfigured after construction.
pub trait Configurable {
    fn configure(&mut self, config: &PersistenceConfig);
}
