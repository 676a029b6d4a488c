#![allow(dead_code)]

use std::sync::Arc;

use inventory::db::{ConnectionManager, DEFAULT_BUSY_TIMEOUT};
use inventory::service::Services;
use inventory::storage::schema;
use tempfile::TempDir;

pub struct TestEnv {
    _dir: TempDir,
    pub db: Arc<ConnectionManager>,
    pub services: Services,
}

pub fn env() -> TestEnv {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = Arc::new(ConnectionManager::new(
        dir.path().join("inventory.sqlite"),
        DEFAULT_BUSY_TIMEOUT,
    ));
    schema::migrate(&db).expect("schema");
    let services = Services::new(db.clone());
    TestEnv {
        _dir: dir,
        db,
        services,
    }
}
