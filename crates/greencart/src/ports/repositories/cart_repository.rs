//! Cart Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, CartItem, CartLine};

/// Repository interface for cart lines
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All cart lines of a user joined with their products, oldest first.
    /// Lines whose product was purged carry `product: None`.
    async fn find_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError>;

    /// Find a cart item by ID, scoped to its owner
    async fn find_item(&self, user_id: Uuid, item_id: Uuid)
        -> Result<Option<CartItem>, DomainError>;

    /// Find the line holding a product, if any
    async fn find_item_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, DomainError>;

    /// Save a cart item (insert or update quantity).
    ///
    /// A user holds at most one line per product: saving a new item for a
    /// product already in the cart sets the quantity on the existing line,
    /// which keeps its ID. Returns the stored line.
    async fn save_item(&self, item: &CartItem) -> Result<CartItem, DomainError>;

    /// Delete one cart item
    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, DomainError>;

    /// Remove every line of a user's cart
    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError>;
}
