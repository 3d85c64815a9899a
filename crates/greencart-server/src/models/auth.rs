//! Auth and profile bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use greencart::{Role, SellerProfile, User};

use crate::application::{ProfileUpdate, Registration, SellerApplication};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    /// `buyer` (default) or `seller`
    pub role: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            city: req.city,
            role: req.role,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub profile_image: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            city: req.city,
            profile_image: req.profile_image,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BecomeSellerRequest {
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub business_address: Option<String>,
    pub phone_number: Option<String>,
    pub tax_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
}

impl From<BecomeSellerRequest> for SellerApplication {
    fn from(req: BecomeSellerRequest) -> Self {
        Self {
            business_name: req.business_name,
            business_description: req.business_description,
            business_address: req.business_address,
            phone_number: req.phone_number,
            tax_id: req.tax_id,
            bank_account_number: req.bank_account_number,
            bank_name: req.bank_name,
        }
    }
}

/// Public view of an account; the password hash never leaves the server
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "buyer")]
    pub role: Role,
    pub city: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            city: user.city,
            profile_image: user.profile_image,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfileResponse {
    pub business_name: String,
    pub business_description: String,
    pub business_address: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<SellerProfile> for BusinessProfileResponse {
    fn from(profile: SellerProfile) -> Self {
        Self {
            business_name: profile.business_name,
            business_description: profile.business_description,
            business_address: profile.business_address,
            phone_number: profile.phone_number,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BecomeSellerResponse {
    pub user: UserResponse,
    pub seller_profile: BusinessProfileResponse,
}
