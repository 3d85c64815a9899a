//! Cart bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use greencart::{CartLine, CartView};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<Uuid>,
    /// Defaults to 1
    pub quantity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub images: Vec<String>,
    pub stock: i32,
    pub is_active: bool,
    pub seller_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product: Option<CartProductResponse>,
    pub quantity: i32,
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.item.id,
            quantity: line.item.quantity,
            product: line.product.map(|p| CartProductResponse {
                id: p.id,
                title: p.title,
                price: p.price,
                images: p.images,
                stock: p.stock,
                is_active: p.is_active,
                seller_id: p.seller_id,
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    /// Two-decimal string, e.g. `"84.97"`
    pub total_amount: String,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        let total_amount = view.total_display();
        Self {
            items: view.lines.into_iter().map(Into::into).collect(),
            total_amount,
        }
    }
}
