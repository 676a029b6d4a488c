// Per-thread SQLite connections and the storage error type shared by the stores.
mod error;
mod pool;

pub use error::StorageError;
pub use pool::{ConnectionManager, Executed, PooledConnection, DEFAULT_BUSY_TIMEOUT};
