//! User - Marketplace account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Role;

/// User account
///
/// `password_hash` is an argon2 PHC string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub city: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with generated ID and timestamps
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        role: Role,
        city: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role,
            city,
            profile_image: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Business details captured when a buyer upgrades to a seller account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerProfile {
    pub user_id: Uuid,
    pub business_name: String,
    pub business_description: String,
    pub business_address: String,
    pub phone_number: String,
    pub tax_id: String,
    pub bank_account_number: String,
    pub bank_name: String,
    pub created_at: DateTime<Utc>,
}
