//! Review Application Service
//!
//! Only buyers who ordered a product may review it, once per order.
//! A product's rating is recomputed from its approved reviews whenever
//! the set of reviews changes.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use greencart::{
    services::sanitize::strip_tags, DomainError, OrderRepository, ProductRepository,
    RatingSummary, Review, ReviewDetails, ReviewRepository, User,
};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Product ID, Order ID, and rating are required")]
    MissingFields,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Not authorized to review this order")]
    NotOrderOwner,

    #[error("Product not found in this order")]
    ProductNotInOrder,

    #[error("Product not found")]
    ProductNotFound,

    #[error("You have already reviewed this product from this order")]
    AlreadyReviewed,

    #[error("Review not found")]
    NotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let message = err.to_string();
        match err {
            ReviewError::MissingFields => ApiError::bad_request("MISSING_FIELDS", message),
            ReviewError::InvalidRating => ApiError::bad_request("INVALID_RATING", message),
            ReviewError::OrderNotFound => ApiError::not_found("ORDER_NOT_FOUND", message),
            ReviewError::NotOrderOwner => ApiError::forbidden("UNAUTHORIZED", message),
            ReviewError::ProductNotInOrder => {
                ApiError::bad_request("PRODUCT_NOT_IN_ORDER", message)
            }
            ReviewError::ProductNotFound => ApiError::not_found("PRODUCT_NOT_FOUND", message),
            ReviewError::AlreadyReviewed => ApiError::bad_request("REVIEW_EXISTS", message),
            ReviewError::NotFound => ApiError::not_found("REVIEW_NOT_FOUND", message),
            ReviewError::Domain(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            reviews,
            orders,
            products,
        }
    }

    pub async fn submit(
        &self,
        buyer: &User,
        submission: ReviewSubmission,
    ) -> Result<Review, ReviewError> {
        let (Some(product_id), Some(order_id), Some(rating)) = (
            submission.product_id,
            submission.order_id,
            submission.rating,
        ) else {
            return Err(ReviewError::MissingFields);
        };
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::InvalidRating);
        }

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(ReviewError::OrderNotFound)?;
        if order.buyer_id != buyer.id {
            return Err(ReviewError::NotOrderOwner);
        }
        if !order.contains_product(product_id) {
            return Err(ReviewError::ProductNotInOrder);
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(ReviewError::ProductNotFound)?;

        if self.reviews.exists(buyer.id, order_id, product_id).await? {
            return Err(ReviewError::AlreadyReviewed);
        }

        // length is checked on what the buyer typed; markup is removed afterwards
        let mut review = Review::new(
            product_id,
            product.seller_id,
            buyer.id,
            order_id,
            rating,
            submission.comment,
        )?;
        review.comment = strip_tags(&review.comment);

        let saved = self.reviews.insert(&review).await.map_err(|e| match e {
            DomainError::Conflict(_) => ReviewError::AlreadyReviewed,
            other => other.into(),
        })?;

        self.refresh_product_rating(product_id).await?;

        tracing::info!(
            "Review {} ({} stars) submitted for product {}",
            saved.id,
            saved.rating,
            product_id
        );
        Ok(saved)
    }

    /// Approved reviews of a product, newest first
    pub async fn by_product(&self, product_id: Uuid) -> Result<Vec<ReviewDetails>, ReviewError> {
        Ok(self.reviews.find_by_product(product_id).await?)
    }

    /// Approved reviews of a seller with their average, rounded to one decimal
    pub async fn by_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<(Vec<ReviewDetails>, RatingSummary), ReviewError> {
        let reviews = self.reviews.find_by_seller(seller_id).await?;
        let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating).collect();
        Ok((reviews, RatingSummary::from_ratings(&ratings).rounded(1)))
    }

    /// Delete a review and recompute its product's rating; returns the removed review
    pub async fn delete(&self, id: Uuid) -> Result<Review, ReviewError> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        if !self.reviews.delete(id).await? {
            return Err(ReviewError::NotFound);
        }
        self.refresh_product_rating(review.product_id).await?;
        Ok(review)
    }

    async fn refresh_product_rating(&self, product_id: Uuid) -> Result<RatingSummary, ReviewError> {
        let ratings = self.reviews.approved_ratings_for_product(product_id).await?;
        let summary = RatingSummary::from_ratings(&ratings).rounded(1);
        self.products
            .update_rating(product_id, summary.average, summary.count as i32)
            .await?;
        Ok(summary)
    }
}
