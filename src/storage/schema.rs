use crate::db::{ConnectionManager, StorageError};

pub const DB_SCHEMA_VERSION: i64 = 1;

// IF NOT EXISTS lets an unversioned database that already holds these tables be adopted.
const SCHEMA_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS Categoria (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        descricao TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS Produto (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        descricao TEXT NOT NULL,
        preco_unitario REAL NOT NULL,
        quantidade_estoque INTEGER,
        categoria_id INTEGER NOT NULL REFERENCES Categoria(id)
    );
    CREATE INDEX IF NOT EXISTS idx_produto_categoria ON Produto(categoria_id);
"#;

/// Brings the database up to [`DB_SCHEMA_VERSION`], tracked through `PRAGMA user_version`.
pub fn migrate(db: &ConnectionManager) -> Result<(), StorageError> {
    db.acquire()?.with(|conn| {
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|err| StorageError::statement("PRAGMA user_version", err))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }
        if version != 0 {
            return Err(StorageError::SchemaMismatch {
                found: version,
                expected: DB_SCHEMA_VERSION,
            });
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        let tx = conn
            .unchecked_transaction()
            .map_err(|err| StorageError::statement("BEGIN", err))?;
        tx.execute_batch(SCHEMA_V1)
            .map_err(|err| StorageError::statement(SCHEMA_V1, err))?;
        tx.pragma_update(None, "user_version", DB_SCHEMA_VERSION)
            .map_err(|err| StorageError::statement("PRAGMA user_version", err))?;
        tx.commit()
            .map_err(|err| StorageError::statement("COMMIT", err))
    })
}
