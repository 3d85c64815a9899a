//! Review bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use greencart::{Review, ReviewDetails};

use crate::application::ReviewSubmission;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    /// 1 to 5
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl From<SubmitReviewRequest> for ReviewSubmission {
    fn from(req: SubmitReviewRequest) -> Self {
        Self {
            product_id: req.product_id,
            order_id: req.order_id,
            rating: req.rating,
            comment: req.comment,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBuyerResponse {
    pub id: Uuid,
    pub username: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewProductResponse {
    pub id: Uuid,
    pub title: String,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub order_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<ReviewBuyerResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ReviewProductResponse>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            seller_id: review.seller_id,
            buyer_id: review.buyer_id,
            order_id: review.order_id,
            rating: review.rating,
            comment: review.comment,
            is_approved: review.is_approved,
            created_at: review.created_at,
            buyer: None,
            product: None,
        }
    }
}

impl From<ReviewDetails> for ReviewResponse {
    fn from(details: ReviewDetails) -> Self {
        let buyer = ReviewBuyerResponse {
            id: details.review.buyer_id,
            username: details.buyer_username,
            profile_image: details.buyer_profile_image,
        };
        let product = ReviewProductResponse {
            id: details.review.product_id,
            title: details.product_title,
            images: details.product_images,
        };

        let mut response = ReviewResponse::from(details.review);
        response.buyer = Some(buyer);
        response.product = Some(product);
        response
    }
}
