//! Seller storefront bodies

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ReviewResponse;
use crate::application::SellerStats;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub city: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_count: i64,
    /// Two decimals, over approved reviews
    pub average_rating: f64,
    pub total_reviews: i64,
}

impl From<SellerStats> for SellerProfileResponse {
    fn from(stats: SellerStats) -> Self {
        Self {
            id: stats.seller.id,
            username: stats.seller.username,
            city: stats.seller.city,
            profile_image: stats.seller.profile_image,
            created_at: stats.seller.created_at,
            product_count: stats.product_count,
            average_rating: stats.rating.average,
            total_reviews: stats.rating.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub average_rating: f64,
    pub total_reviews: i64,
}
