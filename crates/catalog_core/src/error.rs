use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} not found with {field}: '{value}'")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} with {field} '{value}' already exists")]
    DuplicateValue {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{reason}")]
    IntegrityConflict { entity: &'static str, reason: String },

    #[error("Validation failed for one or more fields")]
    FieldValidation(Vec<FieldViolation>),

    #[error("{0}")]
    MalformedInput(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// A category name that is already taken.
    pub fn duplicate_name(name: &str) -> Self {
        Self::DuplicateValue {
            entity: "Category",
            field: "name",
            value: name.to_string(),
        }
    }

    /// A SKU code that is already taken.
    pub fn duplicate_code(sku_code: &str) -> Self {
        Self::DuplicateValue {
            entity: "SKU",
            field: "skuCode",
            value: sku_code.to_string(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldValidation(vec![FieldViolation::new(field, message)])
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::DuplicateValue { .. } => 400,
            Self::IntegrityConflict { .. } => 400,
            Self::FieldValidation(_) => 400,
            Self::MalformedInput(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Field-level violations, empty for every other variant.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::FieldValidation(v) => v,
            _ => &[],
        }
    }
}

/// One failed field constraint, rendered as `{field, message}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
