//! Checkout rules: turn a cart into an order snapshot

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    entities::{CartLine, Order, OrderItem},
    value_objects::{OrderStatus, PaymentStatus},
};

/// Payment method recorded on every order
pub const PAYMENT_METHOD: &str = "mock";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("One or more products in cart no longer exist")]
    ProductMissing,

    #[error("Product \"{title}\" is no longer available")]
    ProductUnavailable { title: String },

    #[error("Insufficient stock for {title}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        title: String,
        available: i32,
        requested: i32,
    },
}

/// Validate every cart line and build a pending order with price snapshots.
///
/// Lines are checked in cart order and the first failure wins.
pub fn build_order(buyer_id: Uuid, lines: &[CartLine]) -> Result<Order, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let product = line.product.as_ref().ok_or(CheckoutError::ProductMissing)?;

        if !product.is_active {
            return Err(CheckoutError::ProductUnavailable {
                title: product.title.clone(),
            });
        }
        if product.stock < line.item.quantity {
            return Err(CheckoutError::InsufficientStock {
                title: product.title.clone(),
                available: product.stock,
                requested: line.item.quantity,
            });
        }

        items.push(OrderItem {
            id: Uuid::new_v4(),
            product_id: Some(product.id),
            product_title: product.title.clone(),
            seller_id: product.seller_id,
            quantity: line.item.quantity,
            price: product.price,
        });
    }

    Ok(Order::new(
        buyer_id,
        items,
        OrderStatus::Pending,
        PaymentStatus::Pending,
        PAYMENT_METHOD,
    ))
}
