use thiserror::Error;

use crate::db::StorageError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule rejected the request; the message is meant for end users.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl ServiceError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { table, id } => match id {
                Some(id) => ServiceError::NotFound(format!("no {table} row with id {id}")),
                None => ServiceError::NotFound(format!("{table} entity has no id")),
            },
            other => ServiceError::Storage(other),
        }
    }
}
