use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use rusqlite::{Connection, Params, Row};

use super::StorageError;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

type SharedConnection = Arc<Mutex<Connection>>;

/// Hands every calling thread its own SQLite connection to a single database
/// file. Connections are opened lazily and live until closed explicitly.
pub struct ConnectionManager {
    path: PathBuf,
    busy_timeout: Duration,
    connections: Mutex<HashMap<ThreadId, SharedConnection>>,
}

/// Outcome of a mutating statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: usize,
    pub last_insert_id: i64,
}

/// Scoped handle on the calling thread's connection. Dropping it releases the
/// handle; the connection itself stays cached for the thread.
pub struct PooledConnection {
    conn: SharedConnection,
}

impl PooledConnection {
    pub fn with<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        f(&guard)
    }
}

impl ConnectionManager {
    pub fn new<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout,
            connections: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection_count(&self) -> Result<usize, StorageError> {
        let connections = self.connections.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(connections.len())
    }

    pub fn acquire(&self) -> Result<PooledConnection, StorageError> {
        let id = thread::current().id();
        let mut connections = self.connections.lock().map_err(|_| StorageError::Poisoned)?;
        if let Some(conn) = connections.get(&id) {
            return Ok(PooledConnection {
                conn: Arc::clone(conn),
            });
        }

        let conn = Arc::new(Mutex::new(self.open()?));
        connections.insert(id, Arc::clone(&conn));
        log::debug!(
            "opened SQLite connection for {:?} ({} live)",
            id,
            connections.len()
        );
        Ok(PooledConnection { conn })
    }

    fn open(&self) -> Result<Connection, StorageError> {
        let open_err = |source: rusqlite::Error| StorageError::Open {
            path: self.path.clone(),
            source,
        };
        let conn = Connection::open(&self.path).map_err(open_err)?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(open_err)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(open_err)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(open_err)?;
        conn.busy_timeout(self.busy_timeout).map_err(open_err)?;
        Ok(conn)
    }

    /// Runs a single mutating statement on the calling thread's connection.
    ///
    /// With `commit` set, everything pending on the connection is committed
    /// afterwards, and a failure rolls the open transaction back. Without it,
    /// a transaction is opened if needed and left pending for a later
    /// [`ConnectionManager::commit`] or [`ConnectionManager::rollback`].
    pub fn execute<P: Params>(
        &self,
        sql: &str,
        params: P,
        commit: bool,
    ) -> Result<Executed, StorageError> {
        self.acquire()?.with(|conn| {
            if !commit && conn.is_autocommit() {
                conn.execute_batch("BEGIN")
                    .map_err(|err| StorageError::statement("BEGIN", err))?;
            }

            let outcome = conn.execute(sql, params).and_then(|rows_affected| {
                let executed = Executed {
                    rows_affected,
                    last_insert_id: conn.last_insert_rowid(),
                };
                if commit && !conn.is_autocommit() {
                    conn.execute_batch("COMMIT")?;
                }
                Ok(executed)
            });

            outcome.map_err(|err| {
                if commit && !conn.is_autocommit() {
                    if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                        log::error!("rollback failed after `{}`: {}", sql, rollback_err);
                    }
                }
                log::error!("error executing SQL: {} - {}", sql, err);
                StorageError::statement(sql, err)
            })
        })
    }

    pub fn query<T, P, F>(&self, sql: &str, params: P, map_row: F) -> Result<Vec<T>, StorageError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.acquire()?.with(|conn| {
            let rows = select_all(conn, sql, params, map_row);
            rows.map_err(|err| {
                log::error!("error executing SELECT: {} - {}", sql, err);
                StorageError::statement(sql, err)
            })
        })
    }

    pub fn commit(&self) -> Result<(), StorageError> {
        self.finish("COMMIT")
    }

    pub fn rollback(&self) -> Result<(), StorageError> {
        self.finish("ROLLBACK")
    }

    fn finish(&self, sql: &'static str) -> Result<(), StorageError> {
        self.acquire()?.with(|conn| {
            if conn.is_autocommit() {
                return Ok(());
            }
            conn.execute_batch(sql)
                .map_err(|err| StorageError::statement(sql, err))
        })
    }

    pub fn close_current(&self) -> Result<(), StorageError> {
        self.close(thread::current().id())
    }

    pub fn close(&self, id: ThreadId) -> Result<(), StorageError> {
        let removed = self
            .connections
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .remove(&id);
        if let Some(conn) = removed {
            shutdown(id, conn);
        }
        Ok(())
    }

    pub fn close_all(&self) -> Result<(), StorageError> {
        let drained: Vec<_> = self
            .connections
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .drain()
            .collect();
        for (id, conn) in drained {
            shutdown(id, conn);
        }
        Ok(())
    }

    /// Closes every connection and deletes the database file together with
    /// its WAL side files.
    pub fn reset_all(&self) -> Result<(), StorageError> {
        self.close_all()?;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let file = PathBuf::from(file);
            if file.exists() {
                std::fs::remove_file(&file)?;
            }
        }
        Ok(())
    }
}

fn select_all<T, P, F>(conn: &Connection, sql: &str, params: P, map_row: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn shutdown(id: ThreadId, conn: SharedConnection) {
    match Arc::try_unwrap(conn) {
        Ok(mutex) => {
            let conn = mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Err((_, err)) = conn.close() {
                log::error!("error closing SQLite connection for {:?}: {}", id, err);
            }
        }
        // still checked out; the last handle closes it on drop
        Err(_) => log::debug!("SQLite connection for {:?} still in use, dropping later", id),
    }
}
