//! Admin bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserResponse;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// `buyer`, `seller` or `admin`
    pub role: Option<String>,
}

/// `isActive` is kept as raw JSON so a non-boolean can be reported as such
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[schema(value_type = bool)]
    pub is_active: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUsersResponse {
    pub users: Vec<UserResponse>,
    pub count: usize,
}
