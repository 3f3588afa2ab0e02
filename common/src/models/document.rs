//! Document models.
//!
//! Documents themselves stay opaque JSON. These types only describe the
//! parameters around them and the listing shape returned by the remote
//! service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for listing the documents of a database.
#[derive(Debug, Default, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentListQuery {
    /// Database name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
}

/// Query parameters for fetching one document.
#[derive(Debug, Default, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentQuery {
    /// Database name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Document id.
    #[validate(required, length(min = 1))]
    pub doc: Option<String>,
}

/// Request body for inserting or updating a document.
///
/// Updates carry `_id` and `_rev` inside `document`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WriteDocumentRequest {
    /// Database name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Document body.
    #[validate(required, custom(function = "crate::utils::validate_present"))]
    #[schema(value_type = Option<Object>)]
    pub document: Option<Value>,
}

/// Request body for removing a document.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RemoveDocumentRequest {
    /// Database name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Document id.
    #[validate(required, custom(function = "crate::utils::validate_present"))]
    #[schema(value_type = Option<String>)]
    pub document: Option<Value>,
    /// Current revision token of the document.
    #[schema(value_type = Option<String>)]
    pub revision: Option<Value>,
}

/// Result of a write as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteResult {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

/// Listing of all documents in a database.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub rows: Vec<DocumentRow>,
}

/// One row of a [`DocumentList`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
    /// Document body, present when bodies were requested.
    #[serde(default)]
    pub doc: Option<Value>,
}

impl DocumentList {
    /// Document bodies in row order; rows without a body yield `null`.
    pub fn into_bodies(self) -> Vec<Value> {
        self.rows
            .into_iter()
            .map(|row| row.doc.unwrap_or(Value::Null))
            .collect()
    }
}
