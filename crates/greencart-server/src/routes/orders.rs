//! Order Routes (authenticated)

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use greencart::Role;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ErrorResponse},
    extract::AppPath,
    models::{ApiResponse, OrderResponse},
    AppState,
};

/// Turn the cart into a paid order
#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty cart, unavailable product or not enough stock", body = ErrorResponse),
        (status = 403, description = "Only buyers can check out", body = ErrorResponse),
        (status = 409, description = "Stock changed during checkout", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<(StatusCode, ApiResponse<OrderResponse>), ApiError> {
    current.require_role(&[Role::Buyer])?;

    let order = state.order_service.checkout(&current.0).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(order.into())))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Order history", body = Vec<OrderResponse>)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiResponse<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list(user.id).await?;
    Ok(ApiResponse::ok(orders.into_iter().map(Into::into).collect()))
}

/// One order; visible to its buyer and to admins
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Not your order", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let order = state.order_service.get(&user, id).await?;
    Ok(ApiResponse::ok(order.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders))
        .route("/api/orders/checkout", post(checkout))
        .route("/api/orders/:id", get(get_order))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use greencart::{
        CartRepository, DomainError, Order, OrderRepository, Product, ProductRepository, Role,
    };

    use crate::adapters::memory::InMemoryStore;
    use crate::test_support::TestApp;

    /// Another buyer takes `sold` units of every ordered product just before
    /// the order is written
    struct RivalPurchase {
        store: Arc<InMemoryStore>,
        sold: i32,
    }

    #[async_trait]
    impl OrderRepository for RivalPurchase {
        async fn place_order(&self, order: &Order) -> Result<Order, DomainError> {
            for item in &order.items {
                let Some(id) = item.product_id else { continue };
                if let Some(mut product) =
                    ProductRepository::find_by_id(self.store.as_ref(), id).await?
                {
                    product.stock -= self.sold;
                    ProductRepository::save(self.store.as_ref(), &product).await?;
                }
            }
            OrderRepository::place_order(self.store.as_ref(), order).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
            OrderRepository::find_by_id(self.store.as_ref(), id).await
        }

        async fn find_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
            OrderRepository::find_by_buyer(self.store.as_ref(), buyer_id).await
        }
    }

    async fn stock_of(app: &TestApp, product: &Product) -> i32 {
        ProductRepository::find_by_id(app.store.as_ref(), product.id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_checkout_creates_order_and_decrements_stock() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (buyer, token) = app.user("buyer", Role::Buyer).await;
        let honey = app.product(&seller, "Honey", 15.99, 10, &[]).await;
        let tote = app.product(&seller, "Tote", 24.99, 2, &[]).await;

        app.post("/api/cart/add", Some(&token), json!({"productId": honey.id, "quantity": 2}))
            .await;
        app.post("/api/cart/add", Some(&token), json!({"productId": tote.id}))
            .await;

        let (status, body) = app.post("/api/orders/checkout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
        let order = &body["data"];
        assert_eq!(order["status"], "completed");
        assert_eq!(order["paymentStatus"], "completed");
        assert_eq!(order["paymentMethod"], "mock");
        assert_eq!(order["items"].as_array().unwrap().len(), 2);
        assert_eq!(order["items"][0]["productTitle"], "Honey");
        let total = order["totalAmount"].as_f64().unwrap();
        assert!((total - 56.97).abs() < 1e-9);

        assert_eq!(stock_of(&app, &honey).await, 8);
        assert_eq!(stock_of(&app, &tote).await, 1);
        let lines = CartRepository::find_lines(app.store.as_ref(), buyer.id)
            .await
            .unwrap();
        assert!(lines.is_empty());

        let (status, body) = app.get("/api/orders", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_error_codes() {
        let app = TestApp::new();
        let (seller, seller_token) = app.user("seller", Role::Seller).await;
        let (_, token) = app.user("buyer", Role::Buyer).await;

        let (status, body) = app.post("/api/orders/checkout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "CART_EMPTY");

        let (status, _) = app
            .post("/api/orders/checkout", Some(&seller_token), json!({}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let product = app.product(&seller, "Lamp", 40.0, 3, &[]).await;
        app.post("/api/cart/add", Some(&token), json!({"productId": product.id, "quantity": 3}))
            .await;

        app.set_stock(product.id, 1).await;
        let (status, body) = app.post("/api/orders/checkout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
        assert_eq!(
            body["error"]["message"],
            "Insufficient stock for Lamp. Available: 1, Requested: 3"
        );

        app.deactivate(product.id).await;
        let (status, body) = app.post("/api/orders/checkout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PRODUCT_UNAVAILABLE");
        assert_eq!(body["error"]["message"], "Product \"Lamp\" is no longer available");
    }

    #[tokio::test]
    async fn test_checkout_conflicts_when_stock_sells_out() {
        let app = TestApp::with_orders(|store| Arc::new(RivalPurchase { store, sold: 1 }));
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (buyer, token) = app.user("buyer", Role::Buyer).await;
        let lamp = app.product(&seller, "Lamp", 40.0, 3, &[]).await;

        app.post("/api/cart/add", Some(&token), json!({"productId": lamp.id, "quantity": 3}))
            .await;

        let (status, body) = app.post("/api/orders/checkout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STOCK_CONFLICT");

        // only the rival's unit is gone
        assert_eq!(stock_of(&app, &lamp).await, 2);
        let lines = CartRepository::find_lines(app.store.as_ref(), buyer.id)
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item.quantity, 3);

        let (_, body) = app.get("/api/orders", Some(&token)).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_visibility() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (_, owner_token) = app.user("owner", Role::Buyer).await;
        let (_, other_token) = app.user("other", Role::Buyer).await;
        let (_, admin_token) = app.user("admin", Role::Admin).await;
        let product = app.product(&seller, "Cup", 5.0, 5, &[]).await;

        app.post("/api/cart/add", Some(&owner_token), json!({"productId": product.id}))
            .await;
        let (_, body) = app
            .post("/api/orders/checkout", Some(&owner_token), json!({}))
            .await;
        let uri = format!("/api/orders/{}", body["data"]["id"].as_str().unwrap());

        let (status, _) = app.get(&uri, Some(&owner_token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.get(&uri, Some(&other_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = app.get(&uri, Some(&admin_token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .get(&format!("/api/orders/{}", uuid::Uuid::new_v4()), Some(&owner_token))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "ORDER_NOT_FOUND");
    }
}
