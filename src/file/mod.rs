//! JSON file-backed persistence.
//!
//! [`JsonFilePersister`] reads and writes a whole collection as one JSON
//! array. [`FilePersistence`] wires it into a [`MemoryPersistence`] so every
//! accepted mutation rewrites the file.
//!
//! [`MemoryPersistence`]: crate::MemoryPersistence

mod json_persister;
mod persistence;

pub use json_persister::JsonFilePersister;
pub use persistence::FilePersistence;
