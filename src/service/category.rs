use std::sync::Arc;

use super::{logged, required_description, ServiceError};
use crate::db::ConnectionManager;
use crate::storage::{CategoryStore, Dao, ProductStore};
use crate::types::Category;

/// Business rules for categories: non-blank, unique descriptions and no
/// deletion while products still reference the category.
#[derive(Clone)]
pub struct CategoryService {
    store: CategoryStore,
    products: ProductStore,
}

impl CategoryService {
    pub fn new(db: Arc<ConnectionManager>) -> Self {
        Self {
            store: CategoryStore::new(db.clone()),
            products: ProductStore::new(db),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.store.list_all()?)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Category>, ServiceError> {
        Ok(self.store.get_one(id)?)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create(&self, description: &str) -> Result<Category, ServiceError> {
        logged("create category", self.try_create(description))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn update(&self, id: i64, description: &str) -> Result<Category, ServiceError> {
        logged("update category", self.try_update(id, description))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        logged("delete category", self.try_delete(id))
    }

    fn try_create(&self, description: &str) -> Result<Category, ServiceError> {
        let description = required_description(description, "category")?;
        if self.store.exists_with_description(&description, None)? {
            return Err(ServiceError::validation(
                "a category with this description already exists",
            ));
        }

        let mut category = Category::new(description);
        let id = self.store.insert(&category)?;
        category.id = Some(id);
        log::info!("created category {} ({})", id, category.description);
        Ok(category)
    }

    fn try_update(&self, id: i64, description: &str) -> Result<Category, ServiceError> {
        self.require(id)?;
        let description = required_description(description, "category")?;
        if self.store.exists_with_description(&description, Some(id))? {
            return Err(ServiceError::validation(
                "a category with this description already exists",
            ));
        }

        let category = Category::with_id(id, description);
        self.store.update(&category)?;
        log::info!("updated category {} ({})", id, category.description);
        Ok(category)
    }

    // Checked here rather than left to the foreign key so the caller learns
    // how many products block the deletion.
    fn try_delete(&self, id: i64) -> Result<(), ServiceError> {
        let category = self.require(id)?;
        let linked = self.products.count_by_category(id)?;
        if linked > 0 {
            return Err(ServiceError::validation(format!(
                "cannot delete category: {linked} product(s) still reference it"
            )));
        }

        self.store.delete(&category)?;
        log::info!("deleted category {} ({})", id, category.description);
        Ok(())
    }

    fn require(&self, id: i64) -> Result<Category, ServiceError> {
        self.store
            .get_one(id)?
            .ok_or_else(|| ServiceError::NotFound("category not found".to_string()))
    }
}
