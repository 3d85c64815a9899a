//! User Repository Port
//!
//! Abstract interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, SellerProfile, User};

/// Repository interface for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by (lowercase) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// All users, newest first
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Save a user (insert or update).
    ///
    /// Fails with `DomainError::Conflict` when the email or username is taken.
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Store the business details of a seller (insert or replace)
    async fn save_seller_profile(
        &self,
        profile: &SellerProfile,
    ) -> Result<SellerProfile, DomainError>;
}
