use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference entry resolving a human-entered country name to its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
        }
    }
}
