//! Cart Routes (authenticated)

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ErrorResponse},
    extract::{AppJson, AppPath},
    models::{AddToCartRequest, ApiResponse, CartResponse, UpdateCartItemRequest},
    AppState,
};

/// The caller's cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Available cart lines and total", body = CartResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let view = state.cart_service.view(user.id).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Missing product, bad quantity or not enough stock", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let view = state
        .cart_service
        .add(user.id, payload.product_id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok(view.into()).with_message("Item added to cart"))
}

/// Change a cart line's quantity
#[utoipa::path(
    put,
    path = "/api/cart/update/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Item updated", body = CartResponse),
        (status = 400, description = "Bad quantity or not enough stock", body = ErrorResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(item_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCartItemRequest>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let view = state
        .cart_service
        .update(user.id, item_id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok(view.into()).with_message("Cart item updated"))
}

/// Remove a cart line
#[utoipa::path(
    delete,
    path = "/api/cart/remove/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(item_id): AppPath<Uuid>,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let view = state.cart_service.remove(user.id, item_id).await?;
    Ok(ApiResponse::ok(view.into()).with_message("Item removed from cart"))
}

/// Empty the cart
#[utoipa::path(
    delete,
    path = "/api/cart/clear",
    responses(
        (status = 200, description = "Cart cleared", body = CartResponse)
    ),
    security(("bearer" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let view = state.cart_service.clear(user.id).await?;
    Ok(ApiResponse::ok(view.into()).with_message("Cart cleared"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/update/:item_id", put(update_cart_item))
        .route("/api/cart/remove/:item_id", delete(remove_from_cart))
        .route("/api/cart/clear", delete(clear_cart))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use greencart::{CartItem, CartRepository, Role};

    use crate::test_support::TestApp;

    #[tokio::test]
    async fn test_racing_adds_keep_one_line_per_product() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (buyer, token) = app.user("buyer", Role::Buyer).await;
        let product = app.product(&seller, "Soap", 4.0, 10, &[]).await;

        // both requests saw an empty cart and built a fresh line
        let first = CartItem::new(buyer.id, product.id, 1);
        let second = CartItem::new(buyer.id, product.id, 2);
        CartRepository::save_item(app.store.as_ref(), &first)
            .await
            .unwrap();
        let stored = CartRepository::save_item(app.store.as_ref(), &second)
            .await
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.quantity, 2);

        let (status, body) = app
            .post("/api/cart/add", Some(&token), json!({"productId": product.id}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], first.id.to_string());
        assert_eq!(items[0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_add_sums_quantities_and_checks_stock() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (_, token) = app.user("buyer", Role::Buyer).await;
        let product = app.product(&seller, "Soap", 4.25, 3, &[]).await;

        let (status, body) = app
            .post(
                "/api/cart/add",
                Some(&token),
                json!({"productId": product.id, "quantity": 2}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item added to cart");
        assert_eq!(body["data"]["totalAmount"], "8.50");

        let (status, body) = app
            .post("/api/cart/add", Some(&token), json!({"productId": product.id}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["quantity"], 3);
        assert_eq!(body["data"]["totalAmount"], "12.75");

        let (status, body) = app
            .post("/api/cart/add", Some(&token), json!({"productId": product.id}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");
        assert_eq!(
            body["error"]["message"],
            "Cannot add more items. Only 3 available in stock"
        );
    }

    #[tokio::test]
    async fn test_add_validation_codes() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (_, token) = app.user("buyer", Role::Buyer).await;
        let product = app.product(&seller, "Soap", 4.0, 1, &[]).await;
        let inactive = app.product(&seller, "Gone", 4.0, 1, &[]).await;
        app.deactivate(inactive.id).await;

        let cases = [
            (json!({}), StatusCode::BAD_REQUEST, "PRODUCT_ID_REQUIRED"),
            (
                json!({"productId": product.id, "quantity": 0}),
                StatusCode::BAD_REQUEST,
                "INVALID_QUANTITY",
            ),
            (
                json!({"productId": uuid::Uuid::new_v4()}),
                StatusCode::NOT_FOUND,
                "PRODUCT_NOT_FOUND",
            ),
            (
                json!({"productId": inactive.id}),
                StatusCode::BAD_REQUEST,
                "PRODUCT_NOT_AVAILABLE",
            ),
            (
                json!({"productId": product.id, "quantity": 2}),
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_STOCK",
            ),
        ];

        for (payload, expected_status, expected_code) in cases {
            let (status, body) = app.post("/api/cart/add", Some(&token), payload).await;
            assert_eq!(status, expected_status, "{expected_code}");
            assert_eq!(body["error"]["code"], expected_code);
        }
    }

    #[tokio::test]
    async fn test_update_remove_and_clear() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (_, token) = app.user("buyer", Role::Buyer).await;
        let product = app.product(&seller, "Mug", 10.0, 5, &[]).await;

        let (_, body) = app
            .post("/api/cart/add", Some(&token), json!({"productId": product.id}))
            .await;
        let item_id = body["data"]["items"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .put(
                &format!("/api/cart/update/{item_id}"),
                Some(&token),
                json!({"quantity": 6}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only 5 items available in stock");

        let (status, body) = app
            .put(
                &format!("/api/cart/update/{item_id}"),
                Some(&token),
                json!({"quantity": 4}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalAmount"], "40.00");

        let (status, body) = app
            .put(
                &format!("/api/cart/update/{}", uuid::Uuid::new_v4()),
                Some(&token),
                json!({"quantity": 1}),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "CART_ITEM_NOT_FOUND");

        let (status, body) = app
            .delete(&format!("/api/cart/remove/{item_id}"), Some(&token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"], json!([]));

        let (status, _) = app
            .delete(&format!("/api/cart/remove/{item_id}"), Some(&token))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.delete("/api/cart/clear", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalAmount"], "0.00");
    }

    #[tokio::test]
    async fn test_cart_hides_unavailable_products() {
        let app = TestApp::new();
        let (seller, _) = app.user("seller", Role::Seller).await;
        let (_, token) = app.user("buyer", Role::Buyer).await;
        let keep = app.product(&seller, "Keep", 2.0, 5, &[]).await;
        let hide = app.product(&seller, "Hide", 3.0, 5, &[]).await;

        for id in [keep.id, hide.id] {
            app.post("/api/cart/add", Some(&token), json!({"productId": id}))
                .await;
        }
        app.deactivate(hide.id).await;

        let (_, body) = app.get("/api/cart", Some(&token)).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["product"]["title"], "Keep");
        assert_eq!(body["data"]["totalAmount"], "2.00");
    }
}
