//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::error::{ErrorBody, ErrorResponse};
use crate::models::{
    // Admin models
    AdminUsersResponse,
    // Cart models
    AddToCartRequest,
    // Auth models
    AuthResponse,
    BecomeSellerRequest,
    BecomeSellerResponse,
    BusinessProfileResponse,
    CartItemResponse,
    CartProductResponse,
    CartResponse,
    LoginRequest,
    MessageResponse,
    // Order models
    OrderItemResponse,
    OrderResponse,
    // Product models
    PaginationResponse,
    ProductListResponse,
    ProductRequest,
    ProductResponse,
    ProductsResponse,
    RegisterRequest,
    // Review models
    ReviewBuyerResponse,
    ReviewProductResponse,
    ReviewResponse,
    // Seller models
    SellerProfileResponse,
    SellerReviewsResponse,
    SellerSummaryResponse,
    SubmitReviewRequest,
    UpdateCartItemRequest,
    UpdateProfileRequest,
    UpdateRoleRequest,
    UpdateStatusRequest,
    UserEnvelope,
    UserResponse,
};

use super::health::HealthResponse;

/// Registers the `bearer` scheme referenced by authenticated paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        // Health
        super::health::health_check,
        // Auth endpoints
        super::auth::register,
        super::auth::login,
        super::auth::me,
        super::auth::update_profile,
        super::auth::become_seller,
        // Product endpoints
        super::products::list_products,
        super::products::get_product,
        super::products::products_by_seller,
        super::products::create_product,
        super::products::update_product,
        super::products::delete_product,
        // Cart endpoints
        super::cart::get_cart,
        super::cart::add_to_cart,
        super::cart::update_cart_item,
        super::cart::remove_from_cart,
        super::cart::clear_cart,
        // Order endpoints
        super::orders::checkout,
        super::orders::list_orders,
        super::orders::get_order,
        // Review endpoints
        super::reviews::submit_review,
        super::reviews::product_reviews,
        super::reviews::seller_reviews,
        // Seller endpoints
        super::sellers::get_seller,
        super::sellers::seller_products,
        super::sellers::seller_reviews,
        // Admin endpoints
        super::admin::list_users,
        super::admin::update_user_role,
        super::admin::update_user_status,
        super::admin::delete_product,
        super::admin::delete_review,
    ),
    info(
        title = "GreenCart API",
        version = "0.1.0",
        description = "Marketplace for sustainable, locally made products.\n\nAuthenticated endpoints take `Authorization: Bearer <token>` from `/api/auth/login`.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Products", description = "Catalog browsing and seller listings"),
        (name = "Cart", description = "The caller's shopping cart"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Reviews", description = "Buyer reviews of purchased products"),
        (name = "Sellers", description = "Public seller storefronts"),
        (name = "Admin", description = "User management and moderation"),
    ),
    components(
        schemas(
            // Shared
            ErrorBody,
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            // Auth
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            BecomeSellerRequest,
            UserResponse,
            AuthResponse,
            UserEnvelope,
            BusinessProfileResponse,
            BecomeSellerResponse,
            // Products
            ProductRequest,
            SellerSummaryResponse,
            ProductResponse,
            PaginationResponse,
            ProductListResponse,
            ProductsResponse,
            // Cart
            AddToCartRequest,
            UpdateCartItemRequest,
            CartProductResponse,
            CartItemResponse,
            CartResponse,
            // Orders
            OrderItemResponse,
            OrderResponse,
            // Reviews
            SubmitReviewRequest,
            ReviewBuyerResponse,
            ReviewProductResponse,
            ReviewResponse,
            // Sellers
            SellerProfileResponse,
            SellerReviewsResponse,
            // Admin
            UpdateRoleRequest,
            UpdateStatusRequest,
            AdminUsersResponse,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/health",
            "/api/auth/register",
            "/api/products/{id}",
            "/api/cart/update/{item_id}",
            "/api/orders/checkout",
            "/api/reviews/seller/{seller_id}",
            "/api/sellers/{id}/reviews",
            "/api/admin/users/{id}/status",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{expected}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
