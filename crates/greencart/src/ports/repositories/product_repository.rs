//! Product Repository Port
//!
//! Abstract interface for catalog persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Product, ProductFilter, ProductWithSeller};

/// Repository interface for Product entities
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// Find a product together with its seller summary
    async fn find_with_seller(&self, id: Uuid) -> Result<Option<ProductWithSeller>, DomainError>;

    /// One page of active products matching the filter, newest first,
    /// plus the total number of matches
    async fn search(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductWithSeller>, i64), DomainError>;

    /// Active products of a seller, newest first
    async fn find_active_by_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<ProductWithSeller>, DomainError>;

    /// Number of active products of a seller
    async fn count_active_by_seller(&self, seller_id: Uuid) -> Result<i64, DomainError>;

    /// Save a product (insert or update)
    async fn save(&self, product: &Product) -> Result<Product, DomainError>;

    /// Permanently remove a product and its reviews
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Store a recomputed rating
    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        review_count: i32,
    ) -> Result<(), DomainError>;
}
