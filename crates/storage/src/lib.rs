#![forbid(unsafe_code)]

pub mod local_store;
pub mod repository;
pub mod sqlite;

pub use local_store::{LAST_LESSON_LANG_KEY, LocalStore, PROGRESS_KEY};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
