use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use super::JsonFilePersister;
use crate::config::{Configurable, PersistenceConfig};
use crate::identity::Identifiable;
use crate::memory::MemoryPersistence;

/// A [`MemoryPersistence`] that keeps its collection in a JSON file.
///
/// The file is read on `open` and rewritten after every accepted mutation.
/// All store operations are reachable through `Deref`.
///
/// Clones share the collection, the file path and the page size.
#[derive(Clone)]
pub struct FilePersistence<T> {
    store: MemoryPersistence<T>,
    persister: Arc<JsonFilePersister<T>>,
}

impl<T: Identifiable> FilePersistence<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_persister(JsonFilePersister::new(path))
    }

    /// A file store whose path comes later from [`Configurable::configure`].
    pub fn empty() -> Self {
        Self::with_persister(JsonFilePersister::empty())
    }

    fn with_persister(persister: JsonFilePersister<T>) -> Self {
        let persister = Arc::new(persister);
        Self {
            store: MemoryPersistence::with_persister(persister.clone()),
            persister,
        }
    }

    pub fn persister(&self) -> &JsonFilePersister<T> {
        &self.persister
    }
}

impl<T> Configurable for FilePersistence<T> {
    fn configure(&mut self, config: &PersistenceConfig) {
        self.store.configure(config);
        self.persister.apply_config(config);
    }
}

impl<T> Deref for FilePersistence<T> {
    type Target = MemoryPersistence<T>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
