#![forbid(unsafe_code)]

pub mod gateway;
pub mod records;
pub mod repository;
pub mod sqlite;

pub use gateway::{PartialState, PersistenceGateway};
pub use repository::{InMemoryStore, KeyValueStore, StateKey, Storage, StorageError};
