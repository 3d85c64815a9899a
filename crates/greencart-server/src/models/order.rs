//! Order bodies

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use greencart::{Order, OrderItem};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    /// `null` once the product has been removed by an admin
    pub product_id: Option<Uuid>,
    pub product_title: String,
    pub seller_id: Uuid,
    pub quantity: i32,
    pub price: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_title: item.product_title,
            seller_id: item.seller_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: f64,
    #[schema(example = "completed")]
    pub status: String,
    #[schema(example = "completed")]
    pub payment_status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            buyer_id: order.buyer_id,
            items: order.items.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method,
            created_at: order.created_at,
        }
    }
}
