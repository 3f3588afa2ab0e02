//! Database models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a database.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDatabaseRequest {
    /// Database name. Naming rules are enforced by the remote service.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
}
