//! Common type definitions shared between the API and database layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Product identifier, assigned by the storage layer on insert.
pub type ProductId = i32;

/// Direction for price-ordered listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse the exact query-string spelling. Anything other than `asc` or `desc` is rejected,
    /// including differently-cased variants.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}
