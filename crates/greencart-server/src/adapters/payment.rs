//! Mock payment gateway: every charge succeeds

use async_trait::async_trait;
use uuid::Uuid;

use greencart::{services::checkout::PAYMENT_METHOD, DomainError, PaymentGateway, PaymentStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct MockPaymentGateway;

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, buyer_id: Uuid, amount: f64) -> Result<PaymentStatus, DomainError> {
        tracing::info!("Mock payment of {:.2} for buyer {}", amount, buyer_id);
        Ok(PaymentStatus::Completed)
    }

    fn method(&self) -> &str {
        PAYMENT_METHOD
    }
}
