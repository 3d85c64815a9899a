//! GreenCart API Server
//!
//! HTTP layer and infrastructure adapters for the GreenCart marketplace.
//!
//! - `adapters/`: Postgres repositories, Cloudinary image storage, mock payments
//! - `application/`: Use-case services wired over the domain ports
//! - `auth/`: JWT issuing, password hashing and request extractors
//! - `routes/`: axum handlers and the OpenAPI document
//!
//! `main.rs` runs the server on Shuttle; `bin/seed.rs` fills a database with
//! demo data.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use greencart::{
    CartRepository, ImageStorage, OrderRepository, PaymentGateway, ProductRepository,
    ReviewRepository, UserRepository,
};

pub mod adapters;
pub mod application;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod security;
pub mod upload;

#[cfg(test)]
mod test_support;

use application::{
    AdminService, AuthService, CartService, OrderService, ProductService, ReviewService,
    SellerService,
};
use auth::JwtKeys;
use config::AppConfig;
use rate_limit::RateLimiter;

/// Request bodies larger than this are rejected with 413
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Repository implementations the services are built over
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub users: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
    pub cart_service: Arc<CartService>,
    pub order_service: Arc<OrderService>,
    pub review_service: Arc<ReviewService>,
    pub seller_service: Arc<SellerService>,
    pub admin_service: Arc<AdminService>,
    pub api_limiter: Arc<RateLimiter>,
    pub auth_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// `images` is `None` when no image host is configured; uploads then fail with 503
    pub fn new(
        config: AppConfig,
        repos: Repositories,
        images: Option<Arc<dyn ImageStorage>>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt_secret, config.jwt_expire));
        let limits = config.rate_limit.clone();

        let review_service = Arc::new(ReviewService::new(
            repos.reviews.clone(),
            repos.orders.clone(),
            repos.products.clone(),
        ));

        Self {
            auth_service: Arc::new(AuthService::new(repos.users.clone(), jwt.clone())),
            product_service: Arc::new(ProductService::new(repos.products.clone(), images)),
            cart_service: Arc::new(CartService::new(
                repos.carts.clone(),
                repos.products.clone(),
            )),
            order_service: Arc::new(OrderService::new(
                repos.carts.clone(),
                repos.orders.clone(),
                payments,
            )),
            seller_service: Arc::new(SellerService::new(
                repos.users.clone(),
                repos.products.clone(),
                repos.reviews.clone(),
            )),
            admin_service: Arc::new(AdminService::new(
                repos.users.clone(),
                repos.products.clone(),
                review_service.clone(),
            )),
            review_service,
            api_limiter: Arc::new(RateLimiter::api(limits.api_max, limits.window)),
            auth_limiter: Arc::new(RateLimiter::auth(limits.auth_max, limits.window)),
            users: repos.users,
            jwt,
            config: Arc::new(config),
        }
    }
}

/// Assemble the full router: API routes behind the rate limiters, health and
/// docs outside them, then tracing, security headers, CORS and the body cap.
pub fn build_router(state: AppState) -> Router {
    let credential_routes = routes::auth::credential_router().route_layer(
        middleware::from_fn_with_state(state.clone(), rate_limit::limit_auth),
    );

    let api_routes = Router::new()
        .merge(credential_routes)
        .merge(routes::auth::router())
        .merge(routes::products::router())
        .merge(routes::cart::router())
        .merge(routes::orders::router())
        .merge(routes::reviews::router())
        .merge(routes::sellers::router())
        .merge(routes::admin::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_api,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(routes::health::router())
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(security::cors_layer(&state.config.frontend_url));

    security::with_security_headers(router).with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{header, StatusCode};
    use serde_json::json;

    use crate::config::RateLimitConfig;
    use crate::test_support::{test_config, TestApp};

    #[tokio::test]
    async fn test_health_is_not_rate_limited() {
        let mut config = test_config();
        config.rate_limit = RateLimitConfig {
            window: Duration::from_secs(900),
            api_max: 1,
            auth_max: 1,
        };
        let app = TestApp::with_config(config);

        for _ in 0..3 {
            let (status, body) = app.get("/api/health", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "GreenCart API is running");
        }

        let (status, _) = app.get("/api/products", None).await;
        assert_eq!(status, StatusCode::OK);

        let response = app.raw_get("/api/products").await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
    }

    #[tokio::test]
    async fn test_login_attempts_are_limited() {
        let mut config = test_config();
        config.rate_limit.auth_max = 2;
        let app = TestApp::with_config(config);
        let payload = json!({"email": "nobody@example.com", "password": "wrong-password"});

        for _ in 0..2 {
            let (status, _) = app.post("/api/auth/login", None, payload.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let (status, body) = app.post("/api/auth/login", None, payload).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");

        // the stricter limiter only covers register and login
        let (status, _) = app.get("/api/products", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let app = TestApp::new();

        for uri in ["/api/health", "/api/products/not-a-uuid", "/api/nowhere"] {
            let response = app.raw_get(uri).await;
            let headers = response.headers();
            assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff", "{uri}");
            assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
            assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
            assert!(headers[header::CONTENT_SECURITY_POLICY]
                .to_str()
                .unwrap()
                .starts_with("default-src 'self'"));
        }
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = TestApp::new();
        let (status, body) = app.get("/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "GreenCart API");
    }
}
