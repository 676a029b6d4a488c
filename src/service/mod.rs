mod category;
mod error;
mod product;

use std::sync::Arc;

pub use category::CategoryService;
pub use error::ServiceError;
pub use product::{ProductService, DEFAULT_LOW_STOCK_THRESHOLD};

use crate::db::ConnectionManager;

/// Both services wired to one connection manager.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
    pub products: ProductService,
}

impl Services {
    pub fn new(db: Arc<ConnectionManager>) -> Self {
        let categories = CategoryService::new(db.clone());
        let products = ProductService::new(db, categories.clone());
        Self {
            categories,
            products,
        }
    }
}

fn logged<T>(operation: &str, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    if let Err(err) = &result {
        match err {
            ServiceError::Storage(_) => log::error!("{operation} failed: {err}"),
            _ => log::warn!("{operation} rejected: {err}"),
        }
    }
    result
}

/// Trimmed description, or a validation error naming `entity` when blank.
fn required_description(raw: &str, entity: &str) -> Result<String, ServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!(
            "{entity} description must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
