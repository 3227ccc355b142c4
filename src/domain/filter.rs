//! Column filters for narrowing the properties view.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::StoreError;

/// Comparison operators a filter may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl FilterOp {
    /// The operator's SQL spelling. Only these fixed strings ever reach
    /// a query.
    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Eq => "=",
            FilterOp::Ge => ">=",
            FilterOp::Gt => ">",
        }
    }
}

impl FromStr for FilterOp {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(FilterOp::Lt),
            "<=" => Ok(FilterOp::Le),
            "=" => Ok(FilterOp::Eq),
            ">=" => Ok(FilterOp::Ge),
            ">" => Ok(FilterOp::Gt),
            other => Err(StoreError::Validation(format!(
                "invalid operator '{other}'; must be one of <, <=, =, >=, >"
            ))),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// One `column <op> value` condition against the properties view.
///
/// The column and operator are validated against fixed sets before any
/// SQL is built; the value is always bound as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_parse_and_display_symmetrically() {
        for symbol in ["<", "<=", "=", ">=", ">"] {
            let op: FilterOp = symbol.parse().unwrap();
            assert_eq!(op.to_string(), symbol);
        }
        assert!(matches!(
            "!=".parse::<FilterOp>(),
            Err(StoreError::Validation(_))
        ));
    }
}
