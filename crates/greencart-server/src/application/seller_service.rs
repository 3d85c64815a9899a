//! Seller Application Service
//!
//! Public storefront data for sellers (and admins, who may also sell).

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use greencart::{
    DomainError, ProductRepository, ProductWithSeller, RatingSummary, ReviewDetails,
    ReviewRepository, User, UserRepository,
};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum SellerError {
    #[error("Seller not found")]
    NotFound,

    #[error("User is not a seller")]
    NotASeller,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<SellerError> for ApiError {
    fn from(err: SellerError) -> Self {
        let message = err.to_string();
        match err {
            SellerError::NotFound => ApiError::not_found("SELLER_NOT_FOUND", message),
            SellerError::NotASeller => ApiError::bad_request("NOT_A_SELLER", message),
            SellerError::Domain(e) => e.into(),
        }
    }
}

/// A seller with their storefront statistics
#[derive(Debug, Clone)]
pub struct SellerStats {
    pub seller: User,
    pub product_count: i64,
    pub rating: RatingSummary,
}

pub struct SellerService {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl SellerService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            users,
            products,
            reviews,
        }
    }

    async fn seller(&self, id: Uuid) -> Result<User, SellerError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(SellerError::NotFound)?;
        if !user.role.can_sell() {
            return Err(SellerError::NotASeller);
        }
        Ok(user)
    }

    /// Average rating is over approved reviews, rounded to two decimals
    pub async fn profile(&self, id: Uuid) -> Result<SellerStats, SellerError> {
        let seller = self.seller(id).await?;
        let product_count = self.products.count_active_by_seller(id).await?;
        let ratings = self.reviews.approved_ratings_for_seller(id).await?;

        Ok(SellerStats {
            seller,
            product_count,
            rating: RatingSummary::from_ratings(&ratings).rounded(2),
        })
    }

    pub async fn products(&self, id: Uuid) -> Result<Vec<ProductWithSeller>, SellerError> {
        self.seller(id).await?;
        Ok(self.products.find_active_by_seller(id).await?)
    }

    pub async fn reviews(
        &self,
        id: Uuid,
    ) -> Result<(Vec<ReviewDetails>, RatingSummary), SellerError> {
        self.seller(id).await?;
        let reviews = self.reviews.find_by_seller(id).await?;
        let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating).collect();
        Ok((reviews, RatingSummary::from_ratings(&ratings).rounded(2)))
    }
}
