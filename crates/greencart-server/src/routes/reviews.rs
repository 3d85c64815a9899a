//! Review Routes

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
    extract::{AppJson, AppPath},
    models::{ApiResponse, ReviewResponse, SubmitReviewRequest},
    AppState,
};

/// Review a product from one of the caller's orders
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review submitted", body = ReviewResponse),
        (status = 400, description = "Missing fields, bad rating or already reviewed", body = ErrorResponse),
        (status = 403, description = "Not your order", body = ErrorResponse),
        (status = 404, description = "Order or product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(payload): AppJson<SubmitReviewRequest>,
) -> Result<(StatusCode, ApiResponse<ReviewResponse>), ApiError> {
    current.require_role(&[Role::Buyer])?;

    let review = state
        .review_service
        .submit(&current.0, payload.into())
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(review.into())))
}

/// Approved reviews of a product, newest first
#[utoipa::path(
    get,
    path = "/api/reviews/product/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews with count", body = Vec<ReviewResponse>)
    ),
    tag = "Reviews"
)]
pub async fn product_reviews(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
) -> Result<ApiResponse<Vec<ReviewResponse>>, ApiError> {
    let reviews = state.review_service.by_product(product_id).await?;
    let count = reviews.len();
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()).with_count(count))
}

/// Approved reviews across a seller's products with their average
#[utoipa::path(
    get,
    path = "/api/reviews/seller/{seller_id}",
    params(("seller_id" = Uuid, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Reviews with count and averageRating", body = Vec<ReviewResponse>)
    ),
    tag = "Reviews"
)]
pub async fn seller_reviews(
    State(state): State<AppState>,
    AppPath(seller_id): AppPath<Uuid>,
) -> Result<ApiResponse<Vec<ReviewResponse>>, ApiError> {
    let (reviews, summary) = state.review_service.by_seller(seller_id).await?;
    let count = reviews.len();
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect())
        .with_count(count)
        .with_average_rating(summary.average))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(submit_review))
        .route("/api/reviews/product/:product_id", get(product_reviews))
        .route("/api/reviews/seller/:seller_id", get(seller_reviews))
}
