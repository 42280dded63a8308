//! Generic in-memory persistence for identifiable records.
//!
//! [`MemoryPersistence`] holds a collection of records behind a read/write
//! lock and offers filter, paging, sort and projection queries plus
//! copy-on-write CRUD. A [`Loader`]/[`Saver`] pair hydrates and flushes the
//! collection; [`FilePersistence`] plugs in a JSON file.

// Lets the derive's `persist_rust::` paths resolve inside this crate's own tests.
extern crate self as persist_rust;

mod config;
mod error;
mod file;
mod identity;
mod memory;
mod query;

pub use config::{Configurable, PersistenceConfig, PersistenceOptions, DEFAULT_MAX_PAGE_SIZE};
pub use error::{PersistenceError, Result};
pub use file::{FilePersistence, JsonFilePersister};
pub use identity::{
    deep_copy, generate_id_if_empty, get_id, get_property, set_id, set_property, AnyMap,
    FieldMap, Identifiable, IdentityKey, ID_FIELD,
};
pub use memory::{Loader, MemoryPersistence, Saver};
pub use query::{sort_by_less, DataPage, Filter, PagingParams, ProjectFn, SelectFn, SortFn};

// Re-export the derive macro alongside the trait of the same name
pub use persist_rust_macros::Identifiable;
