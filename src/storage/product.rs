use std::sync::Arc;

use rusqlite::params;

use super::traits::{require_id, require_row, Dao};
use crate::db::{ConnectionManager, StorageError};
use crate::types::{Category, Product};

const TABLE: &str = "Produto";

// The inner join guarantees every product comes back with its category.
const SELECT_PRODUCTS: &str = r#"
    SELECT p.id, p.descricao, p.preco_unitario, p.quantidade_estoque,
           p.categoria_id, c.descricao AS categoria_descricao
    FROM Produto p
    INNER JOIN Categoria c ON c.id = p.categoria_id
"#;

#[derive(Clone)]
pub struct ProductStore {
    db: Arc<ConnectionManager>,
}

fn map_product_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: Some(row.get(0)?),
        description: row.get(1)?,
        unit_price: row.get(2)?,
        stock_quantity: row.get(3)?,
        category: Category {
            id: Some(row.get(4)?),
            description: row.get(5)?,
        },
    })
}

/// Escapes LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl ProductStore {
    pub fn new(db: Arc<ConnectionManager>) -> Self {
        Self { db }
    }

    pub fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, StorageError> {
        let sql = format!("{SELECT_PRODUCTS} WHERE p.categoria_id = ?1 ORDER BY p.descricao");
        self.db.query(&sql, params![category_id], map_product_row)
    }

    /// Case-insensitive (ASCII) substring match on the description.
    pub fn search_by_description(&self, term: &str) -> Result<Vec<Product>, StorageError> {
        let sql = format!("{SELECT_PRODUCTS} WHERE p.descricao LIKE ?1 ESCAPE '\\' ORDER BY p.descricao");
        let pattern = format!("%{}%", escape_like(term));
        self.db.query(&sql, params![pattern], map_product_row)
    }

    pub fn count_by_category(&self, category_id: i64) -> Result<i64, StorageError> {
        let counts: Vec<i64> = self.db.query(
            "SELECT COUNT(*) FROM Produto WHERE categoria_id = ?1",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(counts.first().copied().unwrap_or(0))
    }
}

impl Dao<Product> for ProductStore {
    fn insert(&self, entity: &Product) -> Result<i64, StorageError> {
        let category_id = require_id("Categoria", entity.category.id)?;
        let executed = self.db.execute(
            r#"
            INSERT INTO Produto (descricao, preco_unitario, quantidade_estoque, categoria_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                entity.description,
                entity.unit_price,
                entity.stock_quantity,
                category_id
            ],
            true,
        )?;
        Ok(executed.last_insert_id)
    }

    fn update(&self, entity: &Product) -> Result<(), StorageError> {
        let id = require_id(TABLE, entity.id)?;
        let category_id = require_id("Categoria", entity.category.id)?;
        let executed = self.db.execute(
            r#"
            UPDATE Produto
            SET descricao = ?1, preco_unitario = ?2, quantidade_estoque = ?3, categoria_id = ?4
            WHERE id = ?5
            "#,
            params![
                entity.description,
                entity.unit_price,
                entity.stock_quantity,
                category_id,
                id
            ],
            true,
        )?;
        require_row(TABLE, id, executed)
    }

    fn delete(&self, entity: &Product) -> Result<(), StorageError> {
        let id = require_id(TABLE, entity.id)?;
        let executed = self
            .db
            .execute("DELETE FROM Produto WHERE id = ?1", params![id], true)?;
        require_row(TABLE, id, executed)
    }

    fn list_all(&self) -> Result<Vec<Product>, StorageError> {
        let sql = format!("{SELECT_PRODUCTS} ORDER BY p.descricao");
        self.db.query(&sql, [], map_product_row)
    }

    fn get_one(&self, id: i64) -> Result<Option<Product>, StorageError> {
        let sql = format!("{SELECT_PRODUCTS} WHERE p.id = ?1");
        let rows = self.db.query(&sql, params![id], map_product_row)?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::test_db;
    use crate::storage::CategoryStore;

    struct Fixture {
        _dir: tempfile::TempDir,
        categories: CategoryStore,
        products: ProductStore,
    }

    fn fixture() -> Fixture {
        let (dir, db) = test_db();
        Fixture {
            _dir: dir,
            categories: CategoryStore::new(db.clone()),
            products: ProductStore::new(db),
        }
    }

    fn category(fx: &Fixture, description: &str) -> Category {
        let id = fx.categories.insert(&Category::new(description)).unwrap();
        Category::with_id(id, description)
    }

    fn product(description: &str, price: f64, qty: Option<i64>, category: &Category) -> Product {
        Product {
            id: None,
            description: description.into(),
            unit_price: price,
            stock_quantity: qty,
            category: category.clone(),
        }
    }

    #[test]
    fn reads_embed_the_full_category() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        let id = fx
            .products
            .insert(&product("Hammer", 9.99, Some(4), &tools))
            .unwrap();

        let loaded = fx.products.get_one(id).unwrap().unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.description, "Hammer");
        assert_eq!(loaded.unit_price, 9.99);
        assert_eq!(loaded.stock_quantity, Some(4));
        assert_eq!(loaded.category, tools);
    }

    #[test]
    fn missing_quantity_reads_back_as_none() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        let id = fx
            .products
            .insert(&product("Saw", 20.0, None, &tools))
            .unwrap();
        assert_eq!(fx.products.get_one(id).unwrap().unwrap().stock_quantity, None);
    }

    #[test]
    fn insert_with_dangling_category_is_rejected_by_foreign_key() {
        let fx = fixture();
        let ghost = Category::with_id(999, "Ghost");
        let err = fx
            .products
            .insert(&product("Hammer", 1.0, Some(1), &ghost))
            .unwrap_err();
        assert!(matches!(err, StorageError::Statement { .. }));
        assert!(fx.products.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_by_category_filters_and_orders() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        let toys = category(&fx, "Toys");
        fx.products.insert(&product("Wrench", 5.0, Some(1), &tools)).unwrap();
        fx.products.insert(&product("Hammer", 9.0, Some(1), &tools)).unwrap();
        fx.products.insert(&product("Ball", 2.0, Some(1), &toys)).unwrap();

        let names: Vec<_> = fx
            .products
            .list_by_category(tools.id.unwrap())
            .unwrap()
            .into_iter()
            .map(|p| p.description)
            .collect();
        assert_eq!(names, vec!["Hammer", "Wrench"]);
        assert_eq!(fx.products.count_by_category(tools.id.unwrap()).unwrap(), 2);
        assert_eq!(fx.products.count_by_category(toys.id.unwrap()).unwrap(), 1);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        fx.products.insert(&product("Claw Hammer", 9.0, Some(1), &tools)).unwrap();
        fx.products.insert(&product("Sledgehammer", 30.0, Some(1), &tools)).unwrap();
        fx.products.insert(&product("Wrench", 5.0, Some(1), &tools)).unwrap();

        let names: Vec<_> = fx
            .products
            .search_by_description("HAMMER")
            .unwrap()
            .into_iter()
            .map(|p| p.description)
            .collect();
        assert_eq!(names, vec!["Claw Hammer", "Sledgehammer"]);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        fx.products.insert(&product("100% cotton rag", 1.0, Some(1), &tools)).unwrap();
        fx.products.insert(&product("1000 screws", 1.0, Some(1), &tools)).unwrap();

        let found = fx.products.search_by_description("0%").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "100% cotton rag");
        assert!(fx.products.search_by_description("_").unwrap().is_empty());
    }

    #[test]
    fn update_moves_product_between_categories() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        let garden = category(&fx, "Garden");
        let id = fx
            .products
            .insert(&product("Rake", 12.0, Some(3), &tools))
            .unwrap();

        let mut rake = fx.products.get_one(id).unwrap().unwrap();
        rake.category = garden.clone();
        rake.stock_quantity = Some(7);
        fx.products.update(&rake).unwrap();

        let loaded = fx.products.get_one(id).unwrap().unwrap();
        assert_eq!(loaded.category, garden);
        assert_eq!(loaded.stock_quantity, Some(7));
    }

    #[test]
    fn delete_of_missing_product_fails_with_not_found() {
        let fx = fixture();
        let tools = category(&fx, "Tools");
        let mut ghost = product("Ghost", 1.0, Some(1), &tools);
        ghost.id = Some(77);
        let err = fx.products.delete(&ghost).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotFound {
                table: "Produto",
                id: Some(77)
            }
        ));
    }

    #[test]
    fn escape_like_escapes_wildcards_and_backslash() {
        assert_eq!(escape_like(r"a%b_c\d"), r"a\%b\_c\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
