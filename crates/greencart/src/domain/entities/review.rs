//! Review - Buyer feedback on a purchased product

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Review of a product from a specific order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub order_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Review joined with buyer and product display fields
#[derive(Debug, Clone)]
pub struct ReviewDetails {
    pub review: Review,
    pub buyer_username: String,
    pub buyer_profile_image: Option<String>,
    pub product_title: String,
    pub product_images: Vec<String>,
}

impl Review {
    /// Create an approved review; the comment is trimmed
    pub fn new(
        product_id: Uuid,
        seller_id: Uuid,
        buyer_id: Uuid,
        order_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DomainError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let comment = comment.unwrap_or_default().trim().to_string();
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(DomainError::Validation(
                "Comment cannot exceed 1000 characters".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            seller_id,
            buyer_id,
            order_id,
            rating,
            comment,
            is_approved: true,
            created_at: Utc::now(),
        })
    }
}
