use serde::{Deserialize, Serialize};

/// A material category ("Metal", "Polymer", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
