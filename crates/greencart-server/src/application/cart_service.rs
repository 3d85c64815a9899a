//! Cart Application Service
//!
//! Every mutation returns the refreshed cart view.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use greencart::{CartItem, CartRepository, CartView, DomainError, ProductRepository};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Product ID is required")]
    ProductIdRequired,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Product is not available")]
    ProductNotAvailable,

    #[error("Only {0} items available in stock")]
    InsufficientStock(i32),

    #[error("Cannot add more items. Only {0} available in stock")]
    StockExhausted(i32),

    #[error("Cart item not found")]
    ItemNotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        let message = err.to_string();
        match err {
            CartError::ProductIdRequired => ApiError::bad_request("PRODUCT_ID_REQUIRED", message),
            CartError::InvalidQuantity => ApiError::bad_request("INVALID_QUANTITY", message),
            CartError::ProductNotFound => ApiError::not_found("PRODUCT_NOT_FOUND", message),
            CartError::ProductNotAvailable => {
                ApiError::bad_request("PRODUCT_NOT_AVAILABLE", message)
            }
            CartError::InsufficientStock(_) | CartError::StockExhausted(_) => {
                ApiError::bad_request("INSUFFICIENT_STOCK", message)
            }
            CartError::ItemNotFound => ApiError::not_found("CART_ITEM_NOT_FOUND", message),
            CartError::Domain(e) => e.into(),
        }
    }
}

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    /// Lines whose product is gone or inactive are left out
    pub async fn view(&self, user_id: Uuid) -> Result<CartView, CartError> {
        let lines = self.carts.find_lines(user_id).await?;
        Ok(CartView::from_lines(lines))
    }

    /// Add `quantity` (default 1) of a product, summing with an existing line
    pub async fn add(
        &self,
        user_id: Uuid,
        product_id: Option<Uuid>,
        quantity: Option<i32>,
    ) -> Result<CartView, CartError> {
        let product_id = product_id.ok_or(CartError::ProductIdRequired)?;
        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        if !product.is_active {
            return Err(CartError::ProductNotAvailable);
        }
        if product.stock < quantity {
            return Err(CartError::InsufficientStock(product.stock));
        }

        let item = match self.carts.find_item_by_product(user_id, product_id).await? {
            Some(mut existing) => {
                let total = existing.quantity.saturating_add(quantity);
                if total > product.stock {
                    return Err(CartError::StockExhausted(product.stock));
                }
                existing.quantity = total;
                existing
            }
            None => CartItem::new(user_id, product_id, quantity),
        };
        self.carts.save_item(&item).await?;

        self.view(user_id).await
    }

    /// Set a line's quantity
    pub async fn update(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: Option<i32>,
    ) -> Result<CartView, CartError> {
        let quantity = quantity.filter(|q| *q >= 1).ok_or(CartError::InvalidQuantity)?;

        let mut item = self
            .carts
            .find_item(user_id, item_id)
            .await?
            .ok_or(CartError::ItemNotFound)?;

        let product = self
            .products
            .find_by_id(item.product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        if quantity > product.stock {
            return Err(CartError::InsufficientStock(product.stock));
        }

        item.quantity = quantity;
        self.carts.save_item(&item).await?;

        self.view(user_id).await
    }

    pub async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<CartView, CartError> {
        if !self.carts.delete_item(user_id, item_id).await? {
            return Err(CartError::ItemNotFound);
        }
        self.view(user_id).await
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<CartView, CartError> {
        self.carts.clear(user_id).await?;
        Ok(CartView::default())
    }
}
