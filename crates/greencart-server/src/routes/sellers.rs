//! Seller Storefront Routes (public)

use axum::{extract::State, routing::get, Router};
use uuid::Uuid;

use crate::{
    error::{ApiError, ErrorResponse},
    extract::AppPath,
    models::{ApiResponse, ProductResponse, SellerProfileResponse, SellerReviewsResponse},
    AppState,
};

/// Public seller profile with storefront statistics
#[utoipa::path(
    get,
    path = "/api/sellers/{id}",
    params(("id" = Uuid, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Seller profile", body = SellerProfileResponse),
        (status = 400, description = "User is not a seller", body = ErrorResponse),
        (status = 404, description = "Seller not found", body = ErrorResponse)
    ),
    tag = "Sellers"
)]
pub async fn get_seller(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<SellerProfileResponse>, ApiError> {
    let stats = state.seller_service.profile(id).await?;
    Ok(ApiResponse::ok(stats.into()))
}

/// A seller's active products
#[utoipa::path(
    get,
    path = "/api/sellers/{id}/products",
    params(("id" = Uuid, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Products with count", body = Vec<ProductResponse>),
        (status = 404, description = "Seller not found", body = ErrorResponse)
    ),
    tag = "Sellers"
)]
pub async fn seller_products(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<Vec<ProductResponse>>, ApiError> {
    let products = state.seller_service.products(id).await?;
    let count = products.len();
    Ok(ApiResponse::ok(products.into_iter().map(Into::into).collect()).with_count(count))
}

/// A seller's approved reviews with their two-decimal average
#[utoipa::path(
    get,
    path = "/api/sellers/{id}/reviews",
    params(("id" = Uuid, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Reviews and rating", body = SellerReviewsResponse),
        (status = 404, description = "Seller not found", body = ErrorResponse)
    ),
    tag = "Sellers"
)]
pub async fn seller_reviews(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<SellerReviewsResponse>, ApiError> {
    let (reviews, summary) = state.seller_service.reviews(id).await?;
    Ok(ApiResponse::ok(SellerReviewsResponse {
        reviews: reviews.into_iter().map(Into::into).collect(),
        average_rating: summary.average,
        total_reviews: summary.count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sellers/:id", get(get_seller))
        .route("/api/sellers/:id/products", get(seller_products))
        .route("/api/sellers/:id/reviews", get(seller_reviews))
}
