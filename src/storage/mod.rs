mod category;
mod product;
pub mod schema;
pub mod traits;

pub use category::CategoryStore;
pub use product::ProductStore;
pub use traits::Dao;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::db::{ConnectionManager, DEFAULT_BUSY_TIMEOUT};

    /// Migrated database in a fresh temporary directory. Keep the `TempDir`
    /// alive for as long as the manager is used.
    pub fn test_db() -> (TempDir, Arc<ConnectionManager>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(ConnectionManager::new(
            dir.path().join("inventory.sqlite"),
            DEFAULT_BUSY_TIMEOUT,
        ));
        super::schema::migrate(&db).unwrap();
        (dir, db)
    }
}
