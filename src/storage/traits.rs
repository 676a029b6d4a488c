use crate::db::{Executed, StorageError};

/// Persistence contract shared by every entity store.
///
/// Every mutating call commits on success. Any database failure is returned
/// as a [`StorageError`]; nothing is swallowed.
pub trait Dao<T> {
    /// Persists an entity that has no id yet and returns the id assigned by the store.
    fn insert(&self, entity: &T) -> Result<i64, StorageError>;

    /// Replaces the row matching `entity`'s id. Fails with
    /// [`StorageError::NotFound`] when the entity has no id or no row matches.
    fn update(&self, entity: &T) -> Result<(), StorageError>;

    /// Deletes the row matching `entity`'s id, with the same not-found rule as `update`.
    fn delete(&self, entity: &T) -> Result<(), StorageError>;

    /// All entities ordered by description.
    fn list_all(&self) -> Result<Vec<T>, StorageError>;

    fn get_one(&self, id: i64) -> Result<Option<T>, StorageError>;
}

pub(crate) fn require_id(table: &'static str, id: Option<i64>) -> Result<i64, StorageError> {
    id.ok_or(StorageError::NotFound { table, id: None })
}

pub(crate) fn require_row(
    table: &'static str,
    id: i64,
    executed: Executed,
) -> Result<(), StorageError> {
    if executed.rows_affected == 0 {
        return Err(StorageError::NotFound {
            table,
            id: Some(id),
        });
    }
    Ok(())
}
