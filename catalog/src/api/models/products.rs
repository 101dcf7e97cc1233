//! API request/response models and input validation for products.
//!
//! Request bodies arrive as untyped JSON and are checked against an explicit input schema
//! ([`CREATE_SCHEMA`], [`UPDATE_SCHEMA`]) before anything is converted into a storage request.
//! Checks are fail-fast: the first violated rule produces the error.

use crate::db::handlers::ProductFilter;
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{ProductId, SortOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

pub const INVALID_PRODUCT_ID: &str = "Invalid product ID.";
pub const INVALID_PAGINATION: &str = "Page and limit must be positive integers.";
pub const INVALID_ORDER: &str = "Order must be either \"asc\" or \"desc\".";
pub const INVALID_BODY: &str = "Request body must be a JSON object.";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const NO_PRODUCTS_FOUND: &str = "No products found";

/// Default page for list requests
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of products per page.
pub const DEFAULT_LIMIT: i64 = 10;

/// What a body field must contain when present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string, possibly empty
    Text,
    /// A JSON string with at least one character
    NonEmptyText,
    /// A JSON number (quoted numbers are strings, not numbers)
    Number,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::NonEmptyText, Value::String(s)) => !s.is_empty(),
            (FieldKind::Number, Value::Number(_)) => true,
            _ => false,
        }
    }
}

/// One entry of an input schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    /// Missing (or null) values are rejected
    pub required: bool,
    /// An explicit null is accepted for optional fields
    pub nullable: bool,
    /// Message returned when the rule is violated
    pub message: &'static str,
}

/// Input schema for creating a product, in check order.
pub const CREATE_SCHEMA: &[FieldRule] = &[
    FieldRule {
        field: "name",
        kind: FieldKind::NonEmptyText,
        required: true,
        nullable: false,
        message: "Name is required and must be a string.",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number,
        required: true,
        nullable: false,
        message: "Price is required and must be a number.",
    },
    FieldRule {
        field: "description",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
        message: "Description must be a string.",
    },
    FieldRule {
        field: "category",
        kind: FieldKind::NonEmptyText,
        required: true,
        nullable: false,
        message: "Category is required and must be a string.",
    },
];

/// Input schema for partially updating a product, in check order.
pub const UPDATE_SCHEMA: &[FieldRule] = &[
    FieldRule {
        field: "name",
        kind: FieldKind::NonEmptyText,
        required: false,
        nullable: false,
        message: "Name must be a string.",
    },
    FieldRule {
        field: "price",
        kind: FieldKind::Number,
        required: false,
        nullable: false,
        message: "Price must be a number.",
    },
    FieldRule {
        field: "description",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
        message: "Description must be a string.",
    },
    FieldRule {
        field: "category",
        kind: FieldKind::NonEmptyText,
        required: false,
        nullable: false,
        message: "Category must be a string.",
    },
];

/// Check a body against a schema. Fields not named by the schema are ignored.
pub fn check_body<'a>(body: &'a Value, schema: &[FieldRule]) -> Result<&'a Map<String, Value>> {
    let object = body.as_object().ok_or_else(|| Error::bad_request(INVALID_BODY))?;

    for rule in schema {
        let ok = match object.get(rule.field) {
            None => !rule.required,
            Some(Value::Null) => !rule.required && rule.nullable,
            Some(value) => rule.kind.accepts(value),
        };
        if !ok {
            return Err(Error::bad_request(rule.message));
        }
    }

    Ok(object)
}

/// Parse a product id path segment. Only plain base-10 integers are accepted.
pub fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<ProductId>().map_err(|_| Error::bad_request(INVALID_PRODUCT_ID))
}

/// Request payload for creating a new product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductCreate {
    /// Display name, must not be empty
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Category label, must not be empty
    pub category: String,
}

impl ProductCreate {
    /// Validate an untyped JSON body against [`CREATE_SCHEMA`] and convert it.
    pub fn from_body(body: Value) -> Result<Self> {
        check_body(&body, CREATE_SCHEMA)?;
        serde_json::from_value(body).map_err(|_| Error::bad_request(INVALID_BODY))
    }
}

impl From<ProductCreate> for ProductCreateDBRequest {
    fn from(create: ProductCreate) -> Self {
        Self {
            name: create.name,
            price: create.price,
            description: create.description,
            category: create.category,
        }
    }
}

/// Request payload for updating a product. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdate {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New unit price
    #[serde(default)]
    pub price: Option<f64>,
    /// New description; an explicit `null` clears it
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New category label
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductUpdate {
    /// Validate an untyped JSON body against [`UPDATE_SCHEMA`] and convert it.
    pub fn from_body(body: Value) -> Result<Self> {
        check_body(&body, UPDATE_SCHEMA)?;
        serde_json::from_value(body).map_err(|_| Error::bad_request(INVALID_BODY))
    }
}

impl From<ProductUpdate> for ProductUpdateDBRequest {
    fn from(update: ProductUpdate) -> Self {
        Self {
            name: update.name,
            price: update.price,
            description: update.description,
            category: update.category,
        }
    }
}

/// A stored product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductDBResponse> for ProductResponse {
    fn from(db: ProductDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            price: db.price,
            description: db.description,
            category: db.category,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Query parameters for listing products a page at a time.
///
/// Values are kept as raw strings so that malformed numbers get the same
/// error as out-of-range ones.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// 1-based page number (default: 1)
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,
    /// Products per page (default: 10)
    #[param(value_type = Option<i64>, minimum = 1)]
    pub limit: Option<String>,
}

impl ListProductsQuery {
    /// Translate `page`/`limit` into a storage page filter.
    pub fn filter(&self) -> Result<ProductFilter> {
        let page = parse_positive(self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive(self.limit.as_deref(), DEFAULT_LIMIT)?;
        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| Error::bad_request(INVALID_PAGINATION))?;
        Ok(ProductFilter::page(skip, limit))
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> Result<i64> {
    let value = match raw {
        None => default,
        Some(raw) => raw.parse::<i64>().map_err(|_| Error::bad_request(INVALID_PAGINATION))?,
    };
    if value < 1 {
        return Err(Error::bad_request(INVALID_PAGINATION));
    }
    Ok(value)
}

/// Query parameters for the price-sorted listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortedProductsQuery {
    /// `asc` (default) or `desc`
    #[param(value_type = Option<SortOrder>)]
    pub order: Option<String>,
}

impl SortedProductsQuery {
    pub fn filter(&self) -> Result<ProductFilter> {
        let order = match self.order.as_deref() {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| Error::bad_request(INVALID_ORDER))?,
        };
        Ok(ProductFilter::sorted_by_price(order))
    }
}
