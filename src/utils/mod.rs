// Shared utilities

pub mod constants;
pub mod datetime;
pub mod storage;

pub use constants::*;
pub use datetime::format_clock;
pub use storage::{KeyValueStorage, MemoryStorage, PersistentStorage, StorageError};
