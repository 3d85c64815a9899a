//! Review Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Review, ReviewDetails};

/// Repository interface for Review entities
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError>;

    /// Whether the buyer already reviewed this product for this order
    async fn exists(
        &self,
        buyer_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Insert a review.
    ///
    /// Fails with `DomainError::Conflict` if (buyer, order, product) already
    /// has a review.
    async fn insert(&self, review: &Review) -> Result<Review, DomainError>;

    /// Approved reviews of a product, newest first
    async fn find_by_product(&self, product_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError>;

    /// Approved reviews of a seller, newest first
    async fn find_by_seller(&self, seller_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError>;

    /// Ratings of the approved reviews of a product
    async fn approved_ratings_for_product(&self, product_id: Uuid)
        -> Result<Vec<i32>, DomainError>;

    /// Ratings of the approved reviews of a seller
    async fn approved_ratings_for_seller(&self, seller_id: Uuid) -> Result<Vec<i32>, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
