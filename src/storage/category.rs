use std::sync::Arc;

use rusqlite::params;

use super::traits::{require_id, require_row, Dao};
use crate::db::{ConnectionManager, StorageError};
use crate::types::Category;

const TABLE: &str = "Categoria";

#[derive(Clone)]
pub struct CategoryStore {
    db: Arc<ConnectionManager>,
}

fn map_category_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        description: row.get(1)?,
    })
}

impl CategoryStore {
    pub fn new(db: Arc<ConnectionManager>) -> Self {
        Self { db }
    }

    /// True when a category other than `exclude_id` already uses exactly this
    /// description. Comparison follows SQLite's default BINARY collation, so
    /// it is case-sensitive.
    pub fn exists_with_description(
        &self,
        description: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StorageError> {
        let counts: Vec<i64> = match exclude_id {
            Some(id) => self.db.query(
                "SELECT COUNT(*) FROM Categoria WHERE descricao = ?1 AND id != ?2",
                params![description, id],
                |row| row.get(0),
            )?,
            None => self.db.query(
                "SELECT COUNT(*) FROM Categoria WHERE descricao = ?1",
                params![description],
                |row| row.get(0),
            )?,
        };
        Ok(counts.first().copied().unwrap_or(0) > 0)
    }
}

impl Dao<Category> for CategoryStore {
    fn insert(&self, entity: &Category) -> Result<i64, StorageError> {
        let executed = self.db.execute(
            "INSERT INTO Categoria (descricao) VALUES (?1)",
            params![entity.description],
            true,
        )?;
        Ok(executed.last_insert_id)
    }

    fn update(&self, entity: &Category) -> Result<(), StorageError> {
        let id = require_id(TABLE, entity.id)?;
        let executed = self.db.execute(
            "UPDATE Categoria SET descricao = ?1 WHERE id = ?2",
            params![entity.description, id],
            true,
        )?;
        require_row(TABLE, id, executed)
    }

    fn delete(&self, entity: &Category) -> Result<(), StorageError> {
        let id = require_id(TABLE, entity.id)?;
        let executed = self
            .db
            .execute("DELETE FROM Categoria WHERE id = ?1", params![id], true)?;
        require_row(TABLE, id, executed)
    }

    // Ordering uses BINARY collation: byte order, not locale-aware alphabetical.
    fn list_all(&self) -> Result<Vec<Category>, StorageError> {
        self.db.query(
            "SELECT id, descricao FROM Categoria ORDER BY descricao",
            [],
            map_category_row,
        )
    }

    fn get_one(&self, id: i64) -> Result<Option<Category>, StorageError> {
        let rows = self.db.query(
            "SELECT id, descricao FROM Categoria WHERE id = ?1",
            params![id],
            map_category_row,
        )?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::test_db;

    #[test]
    fn insert_assigns_id_and_get_one_reads_it_back() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);

        let id = store.insert(&Category::new("Tools")).unwrap();
        let loaded = store.get_one(id).unwrap().unwrap();
        assert_eq!(loaded, Category::with_id(id, "Tools"));
        assert!(store.get_one(id + 100).unwrap().is_none());
    }

    #[test]
    fn list_all_orders_by_description() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);
        for description in ["Toys", "Books", "Garden", "apples"] {
            store.insert(&Category::new(description)).unwrap();
        }

        let names: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|c| c.description)
            .collect();
        // uppercase sorts before lowercase under byte ordering
        assert_eq!(names, vec!["Books", "Garden", "Toys", "apples"]);
    }

    #[test]
    fn update_replaces_description() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);
        let id = store.insert(&Category::new("Tols")).unwrap();

        store.update(&Category::with_id(id, "Tools")).unwrap();
        assert_eq!(store.get_one(id).unwrap().unwrap().description, "Tools");
    }

    #[test]
    fn update_and_delete_of_missing_row_fail_with_not_found() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);

        let err = store.update(&Category::with_id(42, "Ghost")).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotFound {
                table: "Categoria",
                id: Some(42)
            }
        ));
        let err = store.delete(&Category::new("No id")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: None, .. }));
    }

    #[test]
    fn delete_removes_row() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);
        let id = store.insert(&Category::new("Tools")).unwrap();

        store.delete(&Category::with_id(id, "Tools")).unwrap();
        assert!(store.get_one(id).unwrap().is_none());
    }

    #[test]
    fn exists_with_description_is_exact_and_honours_exclusion() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db);
        let id = store.insert(&Category::new("Tools")).unwrap();

        assert!(store.exists_with_description("Tools", None).unwrap());
        assert!(!store.exists_with_description("tools", None).unwrap());
        assert!(!store.exists_with_description("Tools", Some(id)).unwrap());
        assert!(store.exists_with_description("Tools", Some(id + 1)).unwrap());
    }

    #[test]
    fn sql_metacharacters_round_trip_verbatim() {
        let (_dir, db) = test_db();
        let store = CategoryStore::new(db.clone());
        let nasty = "'; DROP TABLE Categoria; --";

        let id = store.insert(&Category::new(nasty)).unwrap();
        assert_eq!(store.get_one(id).unwrap().unwrap().description, nasty);

        let tables: Vec<String> = db
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'Categoria'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, vec!["Categoria"]);
    }
}
