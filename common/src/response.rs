//! API response types.
//!
//! Every locally built response body is a `{ "message": ... }` object; remote
//! results are forwarded untouched and never wrapped.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed response messages.
pub mod messages {
    pub const NO_DATABASES: &str = "none found";
    pub const LIST_DATABASES_FAILED: &str = "error listing databases";
    pub const DATABASE_CREATED: &str = "database created successfully";
    pub const DATABASE_NAME_MISSING: &str = "database name not provided";
    pub const CREATE_DATABASE_FAILED: &str = "error creating database";
    pub const PARAMETER_MISSING: &str = "parameter not provided";
    pub const DATABASE_NOT_FOUND: &str = "database does not exist";
    pub const LIST_DOCUMENTS_FAILED: &str = "error listing documents";
    pub const DOCUMENT_NOT_FOUND: &str = "document not found";
    pub const FETCH_DOCUMENT_FAILED: &str = "error fetching document";
    pub const INSERT_DOCUMENT_FAILED: &str = "error inserting document";
    pub const UPDATE_DOCUMENT_FAILED: &str = "error updating document";
    pub const REMOVE_DOCUMENT_FAILED: &str = "error removing document";
    pub const INVALID_REQUEST: &str = "invalid request";
    pub const RESOURCE_NOT_FOUND: &str = "resource not found";
}

/// Status or error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned for requests that match no route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RouteNotFound {
    /// Always [`messages::RESOURCE_NOT_FOUND`].
    pub message: String,
    /// Error origin, always `internal`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for RouteNotFound {
    fn default() -> Self {
        Self {
            message: messages::RESOURCE_NOT_FOUND.to_string(),
            kind: "internal".to_string(),
        }
    }
}
