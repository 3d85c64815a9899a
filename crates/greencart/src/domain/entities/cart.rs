//! Cart - Shopping cart lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Product;

/// One product line in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(user_id: Uuid, product_id: Uuid, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}

/// Cart item joined with the current product (None if the product is gone)
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Option<Product>,
}

impl CartLine {
    /// Product exists and is still listed
    pub fn is_available(&self) -> bool {
        self.product.as_ref().is_some_and(|p| p.is_active)
    }

    pub fn subtotal(&self) -> f64 {
        self.product
            .as_ref()
            .map(|p| p.price * f64::from(self.item.quantity))
            .unwrap_or(0.0)
    }
}

/// What the buyer sees: available lines and their total
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_amount: f64,
}

impl CartView {
    /// Drop lines whose product is missing or inactive, then total the rest
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let lines: Vec<CartLine> = lines.into_iter().filter(CartLine::is_available).collect();
        let total_amount = lines.iter().map(CartLine::subtotal).sum();
        Self {
            lines,
            total_amount,
        }
    }

    /// Total formatted with two decimals, e.g. "84.97"
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total_amount)
    }
}
