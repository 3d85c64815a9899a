//! Auth Routes
//!
//! Register and login are public and sit behind the stricter auth rate
//! limiter; the rest require a bearer token.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Router,
};

use crate::{
    auth::CurrentUser,
    error::{ApiError, ErrorResponse},
    extract::AppJson,
    models::{
        ApiResponse, AuthResponse, BecomeSellerRequest, BecomeSellerResponse, LoginRequest,
        RegisterRequest, UpdateProfileRequest, UserEnvelope,
    },
    rate_limit::client_ip,
    AppState,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, invalid input or user exists", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<AuthResponse>), ApiError> {
    let ip = client_ip(&headers, None);
    let email = payload.email.clone().unwrap_or_default();

    let (token, user) = state
        .auth_service
        .register(payload.into())
        .await
        .map_err(|e| {
            tracing::warn!(target: "greencart::auth", email = %email, ip = %ip, "Registration failed: {}", e);
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account deactivated", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let ip = client_ip(&headers, None);
    let (token, user) = state
        .auth_service
        .login(payload.email, payload.password, &ip)
        .await?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResponse<UserEnvelope> {
    ApiResponse::ok(user.into())
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Invalid input, username or email taken", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserEnvelope>, ApiError> {
    let user = state
        .auth_service
        .update_profile(user, payload.into())
        .await?;
    Ok(ApiResponse::ok(user.into()).with_message("Profile updated successfully"))
}

/// Upgrade a buyer account to a seller account
#[utoipa::path(
    post,
    path = "/api/auth/become-seller",
    request_body = BecomeSellerRequest,
    responses(
        (status = 200, description = "Account upgraded", body = BecomeSellerResponse),
        (status = 400, description = "Missing business details or already a seller", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn become_seller(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<BecomeSellerRequest>,
) -> Result<ApiResponse<BecomeSellerResponse>, ApiError> {
    let (user, profile) = state
        .auth_service
        .become_seller(user, payload.into())
        .await?;

    Ok(ApiResponse::ok(BecomeSellerResponse {
        user: user.into(),
        seller_profile: profile.into(),
    })
    .with_message("Your account has been upgraded to a seller account"))
}

/// Register and login; layered with the auth rate limiter by the caller
pub fn credential_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", put(update_profile))
        .route("/api/auth/become-seller", post(become_seller))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use greencart::Role;

    use crate::test_support::{TestApp, TEST_PASSWORD};

    #[tokio::test]
    async fn test_register_then_me() {
        let app = TestApp::new();

        let (status, body) = app
            .post(
                "/api/auth/register",
                None,
                json!({"username": "green_grocer", "email": "Grocer@Example.com",
                       "password": "secret1", "city": "Portland", "role": "seller"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user"]["email"], "grocer@example.com");
        assert_eq!(body["data"]["user"]["role"], "seller");
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let token = body["data"]["token"].as_str().unwrap().to_string();
        let (status, body) = app.get("/api/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["username"], "green_grocer");
    }

    #[tokio::test]
    async fn test_register_validation_codes() {
        let app = TestApp::new();
        app.user("taken", Role::Buyer).await;

        let base = json!({"username": "fresh_user", "email": "fresh@example.com",
                          "password": "secret1", "city": "Austin"});
        let with = |key: &str, value: serde_json::Value| {
            let mut payload = base.clone();
            payload[key] = value;
            payload
        };

        let cases = [
            (json!({"username": "only_name"}), "MISSING_FIELDS"),
            (with("email", json!("not-an-email")), "INVALID_INPUT"),
            (with("username", json!("ab")), "INVALID_INPUT"),
            (with("password", json!("12345")), "WEAK_PASSWORD"),
            (with("role", json!("admin")), "INVALID_ROLE"),
            (with("email", json!("taken@example.com")), "USER_EXISTS"),
            (with("username", json!("taken")), "USER_EXISTS"),
        ];
        for (payload, expected_code) in cases {
            let (status, body) = app.post("/api/auth/register", None, payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{expected_code}");
            assert_eq!(body["error"]["code"], expected_code);
        }
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let app = TestApp::new();
        let (user, _) = app.user("shopper", Role::Buyer).await;

        let (status, body) = app
            .post(
                "/api/auth/login",
                None,
                json!({"email": "SHOPPER@example.com", "password": TEST_PASSWORD}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["id"], user.id.to_string());
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

        let (status, body) = app
            .post(
                "/api/auth/login",
                None,
                json!({"email": "shopper@example.com", "password": "wrong-one"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

        let (status, body) = app
            .post("/api/auth/login", None, json!({"email": "shopper@example.com"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_login_refused_for_deactivated_account() {
        let app = TestApp::new();
        let (_, admin_token) = app.user("root", Role::Admin).await;
        let (user, _) = app.user("dormant", Role::Buyer).await;

        app.put(
            &format!("/api/admin/users/{}/status", user.id),
            Some(&admin_token),
            json!({"isActive": false}),
        )
        .await;

        let (status, body) = app
            .post(
                "/api/auth/login",
                None,
                json!({"email": "dormant@example.com", "password": TEST_PASSWORD}),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "ACCOUNT_DEACTIVATED");
    }

    #[tokio::test]
    async fn test_token_errors() {
        let app = TestApp::new();

        let (status, body) = app.get("/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "NO_TOKEN");

        let (status, body) = app.get("/api/auth/me", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");

        let ghost = app.state.jwt.issue(uuid::Uuid::new_v4()).unwrap();
        let (status, body) = app.get("/api/auth/me", Some(&ghost)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = TestApp::new();
        app.user("occupied", Role::Buyer).await;
        let (_, token) = app.user("mover", Role::Buyer).await;

        let (status, body) = app
            .put(
                "/api/auth/profile",
                Some(&token),
                json!({"city": "<i>Seattle</i>", "profileImage": "https://img.example.com/me.png"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile updated successfully");
        assert_eq!(body["data"]["user"]["city"], "Seattle");
        assert_eq!(body["data"]["user"]["profileImage"], "https://img.example.com/me.png");

        let (status, body) = app
            .put("/api/auth/profile", Some(&token), json!({"username": "occupied"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "USERNAME_EXISTS");

        let (status, body) = app
            .put(
                "/api/auth/profile",
                Some(&token),
                json!({"email": "occupied@example.com"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMAIL_EXISTS");
    }

    #[tokio::test]
    async fn test_become_seller() {
        let app = TestApp::new();
        let (buyer, token) = app.user("aspiring", Role::Buyer).await;
        let application = json!({
            "businessName": "Aspiring Goods",
            "businessDescription": "Hand-thrown pottery",
            "businessAddress": "1 Kiln Road",
            "phoneNumber": "(503) 555-0100",
            "taxId": "12-3456789",
            "bankAccountNumber": "000123456",
            "bankName": "Credit Union"
        });

        let mut short_phone = application.clone();
        short_phone["phoneNumber"] = json!("555-0100");
        let (status, body) = app
            .post("/api/auth/become-seller", Some(&token), short_phone)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = app
            .post("/api/auth/become-seller", Some(&token), json!({"businessName": "X"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please provide all required business information"
        );

        let (status, body) = app
            .post("/api/auth/become-seller", Some(&token), application.clone())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["role"], "seller");
        assert_eq!(body["data"]["sellerProfile"]["businessName"], "Aspiring Goods");
        assert!(app.store.seller_profile(buyer.id).is_some());

        let (status, body) = app
            .post("/api/auth/become-seller", Some(&token), application)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "ALREADY_SELLER");
    }
}
