//! Admin Application Service
//!
//! User management and content moderation. Every successful action is
//! written to the `greencart::admin` audit log.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use greencart::{DomainError, ProductRepository, Role, User, UserRepository};

use super::review_service::{ReviewError, ReviewService};
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid role. Must be buyer, seller, or admin")]
    InvalidRole,

    #[error("isActive must be a boolean value")]
    InvalidStatus,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot change your own role")]
    OwnRole,

    #[error("Cannot change your own account status")]
    OwnStatus,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        let message = err.to_string();
        match err {
            AdminError::InvalidRole => ApiError::bad_request("INVALID_ROLE", message),
            AdminError::InvalidStatus => ApiError::bad_request("INVALID_STATUS", message),
            AdminError::UserNotFound => ApiError::not_found("USER_NOT_FOUND", message),
            AdminError::OwnRole => ApiError::bad_request("CANNOT_CHANGE_OWN_ROLE", message),
            AdminError::OwnStatus => ApiError::bad_request("CANNOT_CHANGE_OWN_STATUS", message),
            AdminError::ProductNotFound => ApiError::not_found("PRODUCT_NOT_FOUND", message),
            AdminError::ReviewNotFound => ApiError::not_found("REVIEW_NOT_FOUND", message),
            AdminError::Domain(e) => e.into(),
        }
    }
}

impl From<ReviewError> for AdminError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound => AdminError::ReviewNotFound,
            ReviewError::Domain(e) => AdminError::Domain(e),
            other => AdminError::Domain(DomainError::Repository(other.to_string())),
        }
    }
}

fn audit(admin: &User, action: &str, details: serde_json::Value) {
    tracing::info!(
        target: "greencart::admin",
        admin_id = %admin.id,
        action,
        details = %details,
        "Admin action"
    );
}

pub struct AdminService {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    reviews: Arc<ReviewService>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        reviews: Arc<ReviewService>,
    ) -> Self {
        Self {
            users,
            products,
            reviews,
        }
    }

    /// All users, newest first
    pub async fn users(&self, admin: &User) -> Result<Vec<User>, AdminError> {
        let users = self.users.find_all().await?;
        audit(admin, "GET_ALL_USERS", serde_json::json!({ "count": users.len() }));
        Ok(users)
    }

    pub async fn update_role(
        &self,
        admin: &User,
        id: Uuid,
        role: Option<&str>,
    ) -> Result<User, AdminError> {
        let role: Role = role
            .and_then(|r| r.parse().ok())
            .ok_or(AdminError::InvalidRole)?;

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)?;
        if user.id == admin.id {
            return Err(AdminError::OwnRole);
        }

        let old_role = user.role;
        user.role = role;
        user.updated_at = Utc::now();
        let saved = self.users.save(&user).await?;

        audit(
            admin,
            "UPDATE_USER_ROLE",
            serde_json::json!({ "userId": id, "oldRole": old_role, "newRole": role }),
        );
        Ok(saved)
    }

    /// `is_active` is `None` when the request did not carry a boolean
    pub async fn set_status(
        &self,
        admin: &User,
        id: Uuid,
        is_active: Option<bool>,
    ) -> Result<User, AdminError> {
        let is_active = is_active.ok_or(AdminError::InvalidStatus)?;

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)?;
        if user.id == admin.id {
            return Err(AdminError::OwnStatus);
        }

        user.is_active = is_active;
        user.updated_at = Utc::now();
        let saved = self.users.save(&user).await?;

        audit(
            admin,
            "TOGGLE_USER_STATUS",
            serde_json::json!({ "userId": id, "isActive": is_active }),
        );
        Ok(saved)
    }

    /// Permanently remove a product; its reviews go with it and order
    /// lines keep their title snapshot
    pub async fn delete_product(&self, admin: &User, id: Uuid) -> Result<(), AdminError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(AdminError::ProductNotFound)?;

        if !self.products.delete(id).await? {
            return Err(AdminError::ProductNotFound);
        }

        audit(
            admin,
            "DELETE_PRODUCT",
            serde_json::json!({ "productId": id, "title": product.title }),
        );
        Ok(())
    }

    pub async fn delete_review(&self, admin: &User, id: Uuid) -> Result<(), AdminError> {
        let review = self.reviews.delete(id).await?;

        audit(
            admin,
            "DELETE_REVIEW",
            serde_json::json!({ "reviewId": id, "productId": review.product_id }),
        );
        Ok(())
    }
}
