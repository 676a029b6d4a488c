use serde::{Deserialize, Serialize};

/// A product category. `id` is `None` until the row is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub description: String,
}

impl Category {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
        }
    }

    pub fn with_id(id: i64, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            description: description.into(),
        }
    }
}
