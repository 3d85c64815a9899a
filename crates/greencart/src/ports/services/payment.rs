//! Payment Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, PaymentStatus};

/// Payment processing interface
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge a buyer and report the outcome
    async fn charge(&self, buyer_id: Uuid, amount: f64) -> Result<PaymentStatus, DomainError>;

    /// Method recorded on orders (e.g., "mock")
    fn method(&self) -> &str;
}
