//! Admin Routes
//!
//! Every handler takes `AdminUser`, so non-admins get 403 before any work.

use axum::{
    extract::State,
    routing::{delete, get, put},
    Router,
};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    error::{ApiError, ErrorResponse},
    extract::{AppJson, AppPath},
    models::{
        AdminUsersResponse, ApiResponse, MessageResponse, UpdateRoleRequest, UpdateStatusRequest,
        UserEnvelope,
    },
    AppState,
};

/// All users, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Users and count", body = AdminUsersResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<ApiResponse<AdminUsersResponse>, ApiError> {
    let users = state.admin_service.users(&admin).await?;
    let count = users.len();
    Ok(ApiResponse::ok(AdminUsersResponse {
        users: users.into_iter().map(Into::into).collect(),
        count,
    }))
}

/// Change another user's role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserEnvelope),
        (status = 400, description = "Invalid role or own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<ApiResponse<UserEnvelope>, ApiError> {
    let user = state
        .admin_service
        .update_role(&admin, id, payload.role.as_deref())
        .await?;
    Ok(ApiResponse::ok(user.into()).with_message("User role updated successfully"))
}

/// Activate or deactivate another user's account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserEnvelope),
        (status = 400, description = "Non-boolean isActive or own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<ApiResponse<UserEnvelope>, ApiError> {
    let is_active = payload.is_active.as_ref().and_then(serde_json::Value::as_bool);
    let user = state.admin_service.set_status(&admin, id, is_active).await?;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(ApiResponse::ok(user.into()).with_message(message))
}

/// Permanently delete a product
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<MessageResponse, ApiError> {
    state.admin_service.delete_product(&admin, id).await?;
    Ok(MessageResponse::new("Product deleted successfully"))
}

/// Delete a review and recompute its product's rating
#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<MessageResponse, ApiError> {
    state.admin_service.delete_review(&admin, id).await?;
    Ok(MessageResponse::new("Review deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id/role", put(update_user_role))
        .route("/api/admin/users/:id/status", put(update_user_status))
        .route("/api/admin/products/:id", delete(delete_product))
        .route("/api/admin/reviews/:id", delete(delete_review))
}
