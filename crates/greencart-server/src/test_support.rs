//! Router test harness over the in-memory adapters

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use greencart::{
    ImageStorage, OrderRepository, Product, ProductRepository, Role, SustainabilityTag, User,
    UserRepository,
};

use crate::{
    adapters::{memory::InMemoryImageStorage, memory::InMemoryStore, MockPaymentGateway},
    auth::hash_password,
    build_router,
    config::{AppConfig, RateLimitConfig, DEFAULT_FRONTEND_URL},
    AppState, Repositories,
};

pub const TEST_PASSWORD: &str = "password123";

pub const MULTIPART_BOUNDARY: &str = "greencart-test-boundary";

/// Argon2 is slow on purpose; hash once per test binary
fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hash test password"))
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret-key".to_string(),
        jwt_expire: Duration::from_secs(60 * 60),
        frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        cloudinary: None,
        rate_limit: RateLimitConfig {
            window: Duration::from_secs(15 * 60),
            api_max: 10_000,
            auth_max: 10_000,
        },
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// File name, content type, bytes; always sent as the `images` field
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

fn plain_orders(store: Arc<InMemoryStore>) -> Arc<dyn OrderRepository> {
    store
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub images: Arc<InMemoryImageStorage>,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(test_config(), true, plain_orders)
    }

    pub fn without_image_storage() -> Self {
        Self::build(test_config(), false, plain_orders)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::build(config, true, plain_orders)
    }

    /// Route order persistence through a wrapper around the store
    pub fn with_orders(
        wrap: impl FnOnce(Arc<InMemoryStore>) -> Arc<dyn OrderRepository>,
    ) -> Self {
        Self::build(test_config(), true, wrap)
    }

    fn build(
        config: AppConfig,
        with_images: bool,
        orders: impl FnOnce(Arc<InMemoryStore>) -> Arc<dyn OrderRepository>,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let images = Arc::new(InMemoryImageStorage::default());

        let repos = Repositories {
            users: store.clone(),
            products: store.clone(),
            carts: store.clone(),
            orders: orders(store.clone()),
            reviews: store.clone(),
        };
        let storage: Option<Arc<dyn ImageStorage>> = if with_images {
            Some(images.clone())
        } else {
            None
        };

        let state = AppState::new(config, repos, storage, Arc::new(MockPaymentGateway));
        let router = build_router(state.clone());

        Self {
            store,
            images,
            state,
            router,
        }
    }

    /// Active user in "Test City" with `TEST_PASSWORD` and a valid token
    pub async fn user(&self, name: &str, role: Role) -> (User, String) {
        let user = User::new(
            name.to_string(),
            format!("{name}@example.com"),
            test_password_hash().to_string(),
            role,
            "Test City".to_string(),
        );
        UserRepository::save(self.store.as_ref(), &user)
            .await
            .unwrap();
        let token = self.state.jwt.issue(user.id).unwrap();
        (user, token)
    }

    pub async fn product(
        &self,
        seller: &User,
        title: &str,
        price: f64,
        stock: i32,
        tags: &[SustainabilityTag],
    ) -> Product {
        let product = Product::new(
            seller.id,
            title.to_string(),
            format!("{title} made locally"),
            price,
            Vec::new(),
            tags.to_vec(),
            None,
            stock,
        )
        .unwrap();
        ProductRepository::save(self.store.as_ref(), &product)
            .await
            .unwrap()
    }

    async fn edit_product(&self, id: Uuid, edit: impl FnOnce(&mut Product)) {
        let mut product = ProductRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap();
        edit(&mut product);
        ProductRepository::save(self.store.as_ref(), &product)
            .await
            .unwrap();
    }

    pub async fn deactivate(&self, id: Uuid) {
        self.edit_product(id, |p| p.is_active = false).await;
    }

    pub async fn set_stock(&self, id: Uuid, stock: i32) {
        self.edit_product(id, |p| p.stock = stock).await;
    }

    /// Buy one of each product through the API; returns the order ID
    pub async fn order(&self, token: &str, product_ids: &[Uuid]) -> Uuid {
        for id in product_ids {
            let (status, body) = self
                .post(
                    "/api/cart/add",
                    Some(token),
                    serde_json::json!({ "productId": id }),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }

        let (status, body) = self
            .post("/api/orders/checkout", Some(token), serde_json::json!({}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, json: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, token, json)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, json: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PUT, uri, token, json)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart form: text fields first, then each file as `images`
    pub async fn multipart(
        &self,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> (StatusCode, Value) {
        let parts: Vec<Part<'_>> = fields
            .iter()
            .map(|(name, value)| Part::Text(*name, *value))
            .chain(
                files
                    .iter()
                    .map(|(file, mime, bytes)| Part::File(*file, *mime, *bytes)),
            )
            .collect();

        let req = request(Method::POST, uri, Some(token))
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(multipart_body(&parts)))
            .unwrap();
        self.send(req).await
    }

    /// Unparsed response, for header assertions
    pub async fn raw_get(&self, uri: &str) -> Response {
        let req = request(Method::GET, uri, None).body(Body::empty()).unwrap();
        self.router.clone().oneshot(req).await.unwrap()
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(method: Method, uri: &str, token: Option<&str>, json: Value) -> Request<Body> {
    request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}
