//! Order Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Order};

/// Repository interface for Order entities
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order atomically.
    ///
    /// In one unit of work: insert the order and its items, decrement each
    /// product's stock only where `stock >= quantity`, and clear the buyer's
    /// cart. If any decrement fails nothing is written and
    /// `DomainError::Conflict` is returned.
    async fn place_order(&self, order: &Order) -> Result<Order, DomainError>;

    /// Find an order with its items
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Orders of a buyer, newest first
    async fn find_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError>;
}
