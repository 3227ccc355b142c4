use serde::{Deserialize, Serialize};

use crate::domain::material::Properties;

/// One row of the `category_summaries` view: how many materials a
/// category holds and the mean of each property across them.
///
/// Means are taken over non-null values only; a category with no
/// recorded values for a property (or no materials at all) carries
/// `None` for that mean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub materials: i64,
    #[serde(flatten)]
    pub means: Properties,
}
