//! In-memory persistence with pluggable bulk load/save.
//!
//! [`MemoryPersistence`] keeps every record in memory behind a single
//! read/write lock. A [`Loader`] hydrates the collection at open time and a
//! [`Saver`] receives the whole collection after every accepted mutation, so
//! the same store works purely in memory or backed by a file.
//!
//! ## Example
//!
//! ```ignore
//! use persist_rust::{Identifiable, MemoryPersistence, PagingParams};
//!
//! #[derive(Clone, Serialize, Deserialize, Identifiable)]
//! struct Dummy {
//!     pub id: String,
//!     pub key: String,
//! }
//!
//! let persistence = MemoryPersistence::<Dummy>::new();
//! persistence.open("123")?;
//! let created = persistence.create("123", &Dummy { id: String::new(), key: "Key 1".into() })?;
//! let page = persistence.get_page_by_filter(
//!     "123",
//!     Some(&|d: &Dummy| d.key == "Key 1"),
//!     Some(PagingParams::new(None, Some(10), true)),
//!     None,
//!     None,
//! )?;
//! ```

mod persistence;

use crate::Result;

pub use persistence::MemoryPersistence;

/// Hydrates a store's collection from an external source.
pub trait Loader<T>: Send + Sync {
    /// Loads the full collection. `Ok(None)` means the source holds no data
    /// yet and the store keeps its current collection.
    fn load(&self, correlation_id: &str) -> Result<Option<Vec<T>>>;
}

/// Flushes a store's collection to an external destination.
pub trait Saver<T>: Send + Sync {
    /// Persists the full collection, replacing whatever was saved before.
    fn save(&self, correlation_id: &str, items: &[T]) -> Result<()>;
}
