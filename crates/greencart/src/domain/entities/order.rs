//! Order - Completed purchase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{OrderStatus, PaymentStatus};

/// Purchase made by a buyer, with prices frozen at checkout time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Line of an order
///
/// `product_id` becomes `None` when an admin purges the product;
/// `product_title` keeps the order readable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_title: String,
    pub seller_id: Uuid,
    pub quantity: i32,
    pub price: f64,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl Order {
    /// Total is derived from the items
    pub fn new(
        buyer_id: Uuid,
        items: Vec<OrderItem>,
        status: OrderStatus,
        payment_status: PaymentStatus,
        payment_method: impl Into<String>,
    ) -> Self {
        let total_amount = items.iter().map(OrderItem::subtotal).sum();
        Self {
            id: Uuid::new_v4(),
            buyer_id,
            items,
            total_amount,
            status,
            payment_status,
            payment_method: payment_method.into(),
            created_at: Utc::now(),
        }
    }

    pub fn contains_product(&self, product_id: Uuid) -> bool {
        self.items
            .iter()
            .any(|item| item.product_id == Some(product_id))
    }
}
