//! GreenCart API Client

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use uuid::Uuid;

/// API Client for GreenCart
pub struct GreenCartClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub city: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct SellerInfo {
    pub username: String,
    pub city: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub category: Option<String>,
    #[serde(default)]
    pub sustainability_tags: Vec<String>,
    pub average_rating: f64,
    pub review_count: i32,
    pub seller: Option<SellerInfo>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProductPage {
    pub products: Vec<ProductInfo>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct CartProduct {
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub product: Option<CartProduct>,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_title: String,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AdminUsers {
    pub users: Vec<UserInfo>,
    pub count: usize,
}

/// Catalog filters for `GET /api/products`
#[derive(Debug, Default)]
pub struct ProductSearch {
    pub search: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductSearch {
    /// Query string including the leading `?`, or empty when no filter is set
    pub fn query_string(&self) -> String {
        let page = self.page.map(|p| p.to_string());
        let limit = self.limit.map(|l| l.to_string());
        let pairs: Vec<String> = [
            ("search", self.search.as_deref()),
            ("tags", self.tags.as_deref()),
            ("category", self.category.as_deref()),
            ("city", self.city.as_deref()),
            ("page", page.as_deref()),
            ("limit", limit.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, urlencoding::encode(v))))
        .collect();

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

impl GreenCartClient {
    /// Create a new API client
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the `data` field of the success envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to GreenCart API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(err) => bail!("{} ({}): {}", err.error.code, status, err.error.message),
                Err(_) => bail!("API error ({}): {}", status, body),
            }
        }

        let envelope: Envelope<T> = resp.json().await.context("Failed to parse response")?;
        Ok(envelope.data)
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/api/health")).send().await?;
        Ok(resp.status().is_success())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        let request = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        self.send(request).await
    }

    pub async fn me(&self) -> Result<UserInfo> {
        let envelope: UserEnvelope = self.send(self.client.get(self.url("/api/auth/me"))).await?;
        Ok(envelope.user)
    }

    pub async fn list_products(&self, search: &ProductSearch) -> Result<ProductPage> {
        let path = format!("/api/products{}", search.query_string());
        self.send(self.client.get(self.url(&path))).await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<ProductInfo> {
        let path = format!("/api/products/{}", id);
        self.send(self.client.get(self.url(&path))).await
    }

    pub async fn cart(&self) -> Result<Cart> {
        self.send(self.client.get(self.url("/api/cart"))).await
    }

    pub async fn add_to_cart(&self, product_id: Uuid, quantity: i32) -> Result<Cart> {
        let request = self
            .client
            .post(self.url("/api/cart/add"))
            .json(&json!({ "productId": product_id, "quantity": quantity }));
        self.send(request).await
    }

    pub async fn remove_from_cart(&self, item_id: Uuid) -> Result<Cart> {
        let path = format!("/api/cart/remove/{}", item_id);
        self.send(self.client.delete(self.url(&path))).await
    }

    pub async fn clear_cart(&self) -> Result<Cart> {
        self.send(self.client.delete(self.url("/api/cart/clear"))).await
    }

    pub async fn checkout(&self) -> Result<OrderInfo> {
        self.send(self.client.post(self.url("/api/orders/checkout")))
            .await
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderInfo>> {
        self.send(self.client.get(self.url("/api/orders"))).await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderInfo> {
        let path = format!("/api/orders/{}", id);
        self.send(self.client.get(self.url(&path))).await
    }

    pub async fn admin_users(&self) -> Result<AdminUsers> {
        self.send(self.client.get(self.url("/api/admin/users"))).await
    }
}
