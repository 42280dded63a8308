use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::config::{Configurable, PersistenceConfig};
use crate::memory::{Loader, Saver};
use crate::{PersistenceError, Result};

/// Loads and saves a collection as a JSON array in a flat file.
///
/// The path can be changed after construction (through [`set_path`] or
/// [`Configurable`]) while the persister is shared with a store.
///
/// [`set_path`]: JsonFilePersister::set_path
pub struct JsonFilePersister<T> {
    path: RwLock<Option<PathBuf>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for JsonFilePersister<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> JsonFilePersister<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: RwLock::new(Some(path.into())),
            _marker: PhantomData,
        }
    }

    /// A persister without a path; load and save fail until one is set.
    pub fn empty() -> Self {
        Self {
            path: RwLock::new(None),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_path(&self, path: impl Into<PathBuf>) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = Some(path.into());
    }

    pub(crate) fn apply_config(&self, config: &PersistenceConfig) {
        if let Some(path) = &config.path {
            self.set_path(path.clone());
        }
    }

    fn required_path(&self) -> Result<PathBuf> {
        self.path()
            .ok_or_else(|| PersistenceError::Config("data file path is not set".into()))
    }
}

impl<T> Configurable for JsonFilePersister<T> {
    fn configure(&mut self, config: &PersistenceConfig) {
        self.apply_config(config);
    }
}

fn parse_items<T: DeserializeOwned>(path: &Path, json: &str) -> Result<Vec<T>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Value> = serde_json::from_str(json).map_err(|err| {
        PersistenceError::serialization(
            format!("failed to parse data file {}", path.display()),
            err,
        )
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|err| {
                PersistenceError::serialization(
                    format!("failed to convert item {} of data file {}", index, path.display()),
                    err,
                )
            })
        })
        .collect()
}

impl<T: DeserializeOwned> Loader<T> for JsonFilePersister<T> {
    fn load(&self, correlation_id: &str) -> Result<Option<Vec<T>>> {
        let path = self.required_path()?;

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                trace!(correlation_id, "Data file {} does not exist yet", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    action: "read",
                    path,
                    source,
                })
            }
        };

        parse_items(&path, &json).map(Some)
    }
}

impl<T: Serialize> Saver<T> for JsonFilePersister<T> {
    fn save(&self, correlation_id: &str, items: &[T]) -> Result<()> {
        let path = self.required_path()?;

        let json = serde_json::to_vec(items).map_err(|err| {
            PersistenceError::serialization("failed to convert items to JSON", err)
        })?;
        fs::write(&path, json).map_err(|source| PersistenceError::Io {
            action: "write",
            path: path.clone(),
            source,
        })?;

        trace!(correlation_id, "Wrote {} items to {}", items.len(), path.display());
        Ok(())
    }
}
