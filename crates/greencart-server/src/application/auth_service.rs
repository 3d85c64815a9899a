//! Auth Application Service
//!
//! Registration, login, profile edits and the buyer-to-seller upgrade.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use greencart::{
    services::sanitize::{
        sanitize_email, sanitize_string, sanitize_url, sanitize_username, validate_phone_number,
    },
    DomainError, Role, SellerProfile, User, UserRepository,
};

use crate::{
    auth::{hash_password, verify_password, JwtKeys},
    error::ApiError,
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please provide all required fields: username, email, password, city")]
    MissingFields,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Password must be at least 6 characters long")]
    WeakPassword,

    #[error("Invalid role. Must be buyer or seller")]
    InvalidRole,

    #[error("User with this {0} already exists")]
    UserExists(&'static str),

    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account has been deactivated")]
    Deactivated,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    #[error("{0}")]
    SellerValidation(String),

    #[error("User is already a seller")]
    AlreadySeller,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::MissingFields => ApiError::bad_request("MISSING_FIELDS", message),
            AuthError::InvalidInput(_) => ApiError::bad_request("INVALID_INPUT", message),
            AuthError::WeakPassword => ApiError::bad_request("WEAK_PASSWORD", message),
            AuthError::InvalidRole => ApiError::bad_request("INVALID_ROLE", message),
            AuthError::UserExists(_) => ApiError::bad_request("USER_EXISTS", message),
            AuthError::MissingCredentials => {
                ApiError::bad_request("MISSING_CREDENTIALS", message)
            }
            AuthError::InvalidCredentials => {
                ApiError::unauthorized("INVALID_CREDENTIALS", message)
            }
            AuthError::Deactivated => ApiError::forbidden("ACCOUNT_DEACTIVATED", message),
            AuthError::UsernameTaken => ApiError::bad_request("USERNAME_EXISTS", message),
            AuthError::EmailTaken => ApiError::bad_request("EMAIL_EXISTS", message),
            AuthError::SellerValidation(_) => ApiError::bad_request("VALIDATION_ERROR", message),
            AuthError::AlreadySeller => ApiError::bad_request("ALREADY_SELLER", message),
            AuthError::Domain(e) => e.into(),
        }
    }
}

/// Fields accepted by `register`; all optional so missing ones can be reported
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SellerApplication {
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub business_address: Option<String>,
    pub phone_number: Option<String>,
    pub tax_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtKeys>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid_input(err: DomainError) -> AuthError {
    match err {
        DomainError::Validation(msg) => AuthError::InvalidInput(msg),
        other => other.into(),
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtKeys>) -> Self {
        Self { users, jwt }
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        self.jwt
            .issue(user.id)
            .map_err(|e| DomainError::Repository(e.to_string()).into())
    }

    /// Create a buyer or seller account and sign them in
    pub async fn register(&self, input: Registration) -> Result<(String, User), AuthError> {
        let (Some(username), Some(email), Some(password), Some(city)) = (
            present(input.username),
            present(input.email),
            input.password.filter(|p| !p.is_empty()),
            present(input.city),
        ) else {
            return Err(AuthError::MissingFields);
        };

        let username = sanitize_username(&username).map_err(invalid_input)?;
        let email = sanitize_email(&email).map_err(invalid_input)?;
        let city = sanitize_string(&city);
        if city.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let role = match present(input.role).as_deref() {
            None | Some("buyer") => Role::Buyer,
            Some("seller") => Role::Seller,
            Some(_) => return Err(AuthError::InvalidRole),
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists("email"));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UserExists("username"));
        }

        let password_hash =
            hash_password(&password).map_err(|e| DomainError::Repository(e.to_string()))?;
        let user = User::new(username, email, password_hash, role, city);

        let saved = self.users.save(&user).await.map_err(|e| match e {
            DomainError::Conflict(constraint) if constraint.contains("email") => {
                AuthError::UserExists("email")
            }
            DomainError::Conflict(_) => AuthError::UserExists("username"),
            other => other.into(),
        })?;

        let token = self.issue_token(&saved)?;
        tracing::info!(
            target: "greencart::auth",
            user_id = %saved.id,
            email = %saved.email,
            role = %saved.role,
            "User registered"
        );
        Ok((token, saved))
    }

    /// Check credentials and issue a token
    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
        client_ip: &str,
    ) -> Result<(String, User), AuthError> {
        let (Some(email), Some(password)) = (present(email), password.filter(|p| !p.is_empty()))
        else {
            return Err(AuthError::MissingCredentials);
        };
        let email = sanitize_email(&email).map_err(invalid_input)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::warn!(target: "greencart::auth", email = %email, ip = %client_ip, "Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = verify_password(&user.password_hash, &password).map_err(|e| {
            tracing::error!("Stored hash for user {} is unusable: {}", user.id, e);
            AuthError::InvalidCredentials
        })?;
        if !matches {
            tracing::warn!(target: "greencart::auth", email = %email, ip = %client_ip, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(target: "greencart::auth", email = %email, ip = %client_ip, "Login refused: account deactivated");
            return Err(AuthError::Deactivated);
        }

        let token = self.issue_token(&user)?;
        tracing::info!(target: "greencart::auth", user_id = %user.id, email = %email, ip = %client_ip, "Login succeeded");
        Ok((token, user))
    }

    /// Sanitized partial update of the caller's own profile
    pub async fn update_profile(
        &self,
        mut user: User,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        if let Some(username) = present(update.username) {
            let username = sanitize_username(&username).map_err(invalid_input)?;
            if username != user.username {
                if self.users.find_by_username(&username).await?.is_some() {
                    return Err(AuthError::UsernameTaken);
                }
                user.username = username;
            }
        }

        if let Some(email) = present(update.email) {
            let email = sanitize_email(&email).map_err(invalid_input)?;
            if email != user.email {
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(AuthError::EmailTaken);
                }
                user.email = email;
            }
        }

        if let Some(city) = present(update.city) {
            user.city = sanitize_string(&city);
        }

        if let Some(image) = present(update.profile_image) {
            user.profile_image = Some(sanitize_url(&image).map_err(invalid_input)?);
        }

        user.updated_at = Utc::now();
        self.users.save(&user).await.map_err(|e| match e {
            DomainError::Conflict(constraint) if constraint.contains("email") => {
                AuthError::EmailTaken
            }
            DomainError::Conflict(_) => AuthError::UsernameTaken,
            other => other.into(),
        })
    }

    /// Promote a buyer to seller and record their business details
    pub async fn become_seller(
        &self,
        mut user: User,
        application: SellerApplication,
    ) -> Result<(User, SellerProfile), AuthError> {
        if user.role != Role::Buyer {
            return Err(AuthError::AlreadySeller);
        }

        let fields = [
            present(application.business_name),
            present(application.business_description),
            present(application.business_address),
            present(application.phone_number),
            present(application.tax_id),
            present(application.bank_account_number),
            present(application.bank_name),
        ];
        let [Some(name), Some(description), Some(address), Some(phone), Some(tax_id), Some(account), Some(bank)] =
            fields
        else {
            return Err(AuthError::SellerValidation(
                "Please provide all required business information".to_string(),
            ));
        };

        let phone_number = validate_phone_number(&phone).map_err(|e| match e {
            DomainError::Validation(msg) => AuthError::SellerValidation(msg),
            other => other.into(),
        })?;

        let profile = SellerProfile {
            user_id: user.id,
            business_name: sanitize_string(&name),
            business_description: sanitize_string(&description),
            business_address: sanitize_string(&address),
            phone_number,
            tax_id: sanitize_string(&tax_id),
            bank_account_number: sanitize_string(&account),
            bank_name: sanitize_string(&bank),
            created_at: Utc::now(),
        };

        user.role = Role::Seller;
        user.updated_at = Utc::now();
        let user = self.users.save(&user).await?;
        let profile = self.users.save_seller_profile(&profile).await?;

        tracing::info!(target: "greencart::auth", user_id = %user.id, "User became a seller");
        Ok((user, profile))
    }
}
