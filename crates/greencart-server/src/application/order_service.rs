//! Order Application Service
//!
//! Checkout turns the caller's cart into a completed order. Stock is
//! validated up front and decremented again under a guard inside the
//! repository transaction, so a concurrent purchase surfaces as a conflict.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use greencart::{
    services::checkout::build_order, CartRepository, CheckoutError, DomainError, Order,
    OrderRepository, OrderStatus, PaymentGateway, PaymentStatus, Role, User,
};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Payment was not completed")]
    PaymentFailed,

    #[error("{0}")]
    StockConflict(String),

    #[error("Order not found")]
    NotFound,

    #[error("Not authorized to view this order")]
    NotOwner,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Checkout(CheckoutError::EmptyCart) => {
                ApiError::bad_request("CART_EMPTY", message)
            }
            OrderError::Checkout(
                CheckoutError::ProductMissing | CheckoutError::ProductUnavailable { .. },
            ) => ApiError::bad_request("PRODUCT_UNAVAILABLE", message),
            OrderError::Checkout(CheckoutError::InsufficientStock { .. }) => {
                ApiError::bad_request("INSUFFICIENT_STOCK", message)
            }
            OrderError::PaymentFailed => {
                ApiError::new(StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED", message)
            }
            OrderError::StockConflict(_) => ApiError::conflict("STOCK_CONFLICT", message),
            OrderError::NotFound => ApiError::not_found("ORDER_NOT_FOUND", message),
            OrderError::NotOwner => ApiError::forbidden("UNAUTHORIZED", message),
            OrderError::Domain(e) => e.into(),
        }
    }
}

pub struct OrderService {
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentGateway>,
}

impl OrderService {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            carts,
            orders,
            payments,
        }
    }

    pub async fn checkout(&self, buyer: &User) -> Result<Order, OrderError> {
        let lines = self.carts.find_lines(buyer.id).await?;
        let mut order = build_order(buyer.id, &lines)?;

        let payment = self.payments.charge(buyer.id, order.total_amount).await?;
        if payment != PaymentStatus::Completed {
            tracing::warn!("Payment for buyer {} ended as {}", buyer.id, payment);
            return Err(OrderError::PaymentFailed);
        }
        order.payment_status = payment;
        order.payment_method = self.payments.method().to_string();
        order.status = OrderStatus::Completed;

        let placed = self.orders.place_order(&order).await.map_err(|e| match e {
            DomainError::Conflict(msg) => OrderError::StockConflict(msg),
            other => other.into(),
        })?;

        tracing::info!(
            "Order {} placed by {}: {} item(s), total {:.2}",
            placed.id,
            buyer.id,
            placed.items.len(),
            placed.total_amount
        );
        Ok(placed)
    }

    /// The caller's orders, newest first
    pub async fn list(&self, buyer_id: Uuid) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_by_buyer(buyer_id).await?)
    }

    /// Visible to the buyer who placed it and to admins
    pub async fn get(&self, user: &User, id: Uuid) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if order.buyer_id != user.id && user.role != Role::Admin {
            return Err(OrderError::NotOwner);
        }
        Ok(order)
    }
}
