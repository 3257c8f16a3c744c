//! Member entity definitions

use serde::{Deserialize, Serialize};

/// A row of the `member` table.
///
/// `id` stays `None` until a repository has persisted the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<i64>,
    pub name: String,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
