use std::sync::Arc;

use super::{logged, required_description, CategoryService, ServiceError};
use crate::db::ConnectionManager;
use crate::storage::{Dao, ProductStore};
use crate::types::{Category, Product, ProductInput};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Business rules for products. Category references are resolved through
/// [`CategoryService`] and embedded by value before anything is persisted.
#[derive(Clone)]
pub struct ProductService {
    store: ProductStore,
    categories: CategoryService,
}

impl ProductService {
    pub fn new(db: Arc<ConnectionManager>, categories: CategoryService) -> Self {
        Self {
            store: ProductStore::new(db),
            categories,
        }
    }

    pub fn list_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_all()?)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        Ok(self.store.get_one(id)?)
    }

    pub fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_by_category(category_id)?)
    }

    /// Blank terms match nothing.
    pub fn search_by_description(&self, term: &str) -> Result<Vec<Product>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.search_by_description(term)?)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        logged("create product", self.try_create(input))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn update(&self, id: i64, input: ProductInput) -> Result<Product, ServiceError> {
        logged("update product", self.try_update(id, input))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        logged("delete product", self.try_delete(id))
    }

    /// Products whose quantity is strictly below `threshold`, in description
    /// order. Products without a quantity are never low.
    pub fn low_stock(&self, threshold: i64) -> Result<Vec<Product>, ServiceError> {
        let products = self.store.list_all()?;
        Ok(products
            .into_iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect())
    }

    /// Sum of `unit_price * stock_quantity` over every persisted product.
    pub fn total_inventory_value(&self) -> Result<f64, ServiceError> {
        let products = self.store.list_all()?;
        Ok(products.iter().map(Product::stock_value).sum())
    }

    fn try_create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let (description, category) = self.validate(&input)?;
        let mut product = Product {
            id: None,
            description,
            unit_price: input.unit_price,
            stock_quantity: Some(input.stock_quantity),
            category,
        };
        let id = self.store.insert(&product)?;
        product.id = Some(id);
        log::info!("created product {} ({})", id, product.description);
        Ok(product)
    }

    fn try_update(&self, id: i64, input: ProductInput) -> Result<Product, ServiceError> {
        self.require(id)?;
        let (description, category) = self.validate(&input)?;
        let product = Product {
            id: Some(id),
            description,
            unit_price: input.unit_price,
            stock_quantity: Some(input.stock_quantity),
            category,
        };
        self.store.update(&product)?;
        log::info!("updated product {} ({})", id, product.description);
        Ok(product)
    }

    fn try_delete(&self, id: i64) -> Result<(), ServiceError> {
        let product = self.require(id)?;
        self.store.delete(&product)?;
        log::info!("deleted product {} ({})", id, product.description);
        Ok(())
    }

    fn require(&self, id: i64) -> Result<Product, ServiceError> {
        self.store
            .get_one(id)?
            .ok_or_else(|| ServiceError::NotFound("product not found".to_string()))
    }

    /// Returns the trimmed description and the resolved category.
    fn validate(&self, input: &ProductInput) -> Result<(String, Category), ServiceError> {
        let description = required_description(&input.description, "product")?;
        if !input.unit_price.is_finite() || input.unit_price <= 0.0 {
            return Err(ServiceError::validation(
                "unit price must be greater than zero",
            ));
        }
        if input.stock_quantity < 0 {
            return Err(ServiceError::validation(
                "stock quantity must not be negative",
            ));
        }
        let category = self
            .categories
            .get_by_id(input.category_id)?
            .ok_or_else(|| ServiceError::validation("category not found"))?;
        Ok((description, category))
    }
}
