use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};

use crate::configuration::Configuration;
use crate::db::ConnectionManager;
use crate::service::Services;
use crate::storage::schema;

/// Resolved configuration plus the open database and the services built on it.
pub struct Context {
    pub config: Configuration,
    pub db: Arc<ConnectionManager>,
    pub services: Services,
}

impl Context {
    pub fn open(config: Configuration) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).context("creating data dir")?;

        let db = Arc::new(ConnectionManager::new(
            config.db_path(),
            config.busy_timeout,
        ));
        if config.reset {
            db.reset_all().context("resetting storage")?;
        }
        schema::migrate(&db).context("initializing storage")?;

        let services = Services::new(db.clone());
        Ok(Self {
            config,
            db,
            services,
        })
    }
}
