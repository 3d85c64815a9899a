//! Product Application Service (Use Case)
//!
//! Catalog queries plus seller-side product management.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use greencart::{
    services::sanitize::sanitize_string, DomainError, ImageStorage, ImageUpload, Pagination,
    Product, ProductFilter, ProductPatch, ProductRepository, ProductWithSeller, Role,
    SustainabilityTag, User,
};

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("{0}")]
    CreateInvalid(String),

    #[error("{0}")]
    UpdateInvalid(String),

    #[error("Not authorized to {0} this product")]
    NotOwner(&'static str),

    #[error("Image uploads are not configured")]
    StorageUnavailable,

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound => ApiError::not_found("PRODUCT_NOT_FOUND", message),
            ProductError::CreateInvalid(_) => ApiError::bad_request("PRODUCT_CREATE_ERROR", message),
            ProductError::UpdateInvalid(_) => ApiError::bad_request("PRODUCT_UPDATE_ERROR", message),
            ProductError::NotOwner(_) => ApiError::forbidden("UNAUTHORIZED", message),
            ProductError::StorageUnavailable => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "IMAGE_STORAGE_UNAVAILABLE",
                message,
            ),
            ProductError::Upload(_) => ApiError::new(StatusCode::BAD_GATEWAY, "UPLOAD_ERROR", message),
            ProductError::Domain(e) => e.into(),
        }
    }
}

/// Product fields as submitted by a form or JSON body
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub sustainability_tags: Option<Vec<SustainabilityTag>>,
    pub is_active: Option<bool>,
    /// Messages for fields whose text could not be parsed
    pub invalid: Vec<String>,
}

impl ProductInput {
    fn into_patch(self) -> ProductPatch {
        ProductPatch {
            title: self.title.as_deref().map(sanitize_string),
            description: self.description.as_deref().map(sanitize_string),
            price: self.price,
            sustainability_tags: self.sustainability_tags,
            category: self.category.as_deref().map(sanitize_string),
            stock: self.stock,
            is_active: self.is_active,
            new_images: Vec::new(),
        }
    }
}

pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    images: Option<Arc<dyn ImageStorage>>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        images: Option<Arc<dyn ImageStorage>>,
    ) -> Self {
        Self { products, images }
    }

    /// Active products matching the filter, newest first
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductWithSeller>, Pagination), ProductError> {
        let (products, total) = self.products.search(filter).await?;
        Ok((products, Pagination::new(total, filter.page, filter.limit)))
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductWithSeller, ProductError> {
        self.products
            .find_with_seller(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    pub async fn by_seller(&self, seller_id: Uuid) -> Result<Vec<ProductWithSeller>, ProductError> {
        Ok(self.products.find_active_by_seller(seller_id).await?)
    }

    /// Create a listing owned by `seller`; images are stored only once the fields validate
    pub async fn create(
        &self,
        seller: &User,
        input: ProductInput,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ProductError> {
        if !input.invalid.is_empty() {
            return Err(ProductError::CreateInvalid(input.invalid.join(", ")));
        }

        let is_active = input.is_active;
        let patch = input.into_patch();
        let mut product = Product::new(
            seller.id,
            patch.title.unwrap_or_default(),
            patch.description.unwrap_or_default(),
            patch.price.unwrap_or(f64::NAN),
            Vec::new(),
            patch.sustainability_tags.unwrap_or_default(),
            patch.category,
            patch.stock.unwrap_or(0),
        )
        .map_err(|e| match e {
            DomainError::Validation(msg) => ProductError::CreateInvalid(msg),
            other => other.into(),
        })?;
        if let Some(is_active) = is_active {
            product.is_active = is_active;
        }

        product.images = self.store_images(images).await?;
        let saved = self.products.save(&product).await?;

        tracing::info!("Created product: {} ({})", saved.title, saved.id);
        Ok(saved)
    }

    /// Partial update by the owner or an admin; new images are appended
    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        input: ProductInput,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ProductError> {
        let mut product = self.owned_product(user, id, "update").await?;

        if !input.invalid.is_empty() {
            return Err(ProductError::UpdateInvalid(input.invalid.join(", ")));
        }
        product.apply(input.into_patch()).map_err(|e| match e {
            DomainError::Validation(msg) => ProductError::UpdateInvalid(msg),
            other => other.into(),
        })?;

        let urls = self.store_images(images).await?;
        product.images.extend(urls);

        let saved = self.products.save(&product).await?;
        tracing::info!("Updated product: {} ({})", saved.title, saved.id);
        Ok(saved)
    }

    /// Hide a listing from the catalog; orders and reviews keep pointing at it
    pub async fn deactivate(&self, user: &User, id: Uuid) -> Result<(), ProductError> {
        let mut product = self.owned_product(user, id, "delete").await?;
        product.is_active = false;
        product.updated_at = chrono::Utc::now();
        self.products.save(&product).await?;

        tracing::info!("Deactivated product: {} ({})", product.title, product.id);
        Ok(())
    }

    async fn owned_product(
        &self,
        user: &User,
        id: Uuid,
        action: &'static str,
    ) -> Result<Product, ProductError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;

        if !product.is_owned_by(user.id) && user.role != Role::Admin {
            tracing::warn!(
                target: "greencart::security",
                user_id = %user.id,
                product_id = %id,
                action,
                "Product change refused: not the owner"
            );
            return Err(ProductError::NotOwner(action));
        }
        Ok(product)
    }

    async fn store_images(&self, images: Vec<ImageUpload>) -> Result<Vec<String>, ProductError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let storage = self
            .images
            .as_ref()
            .ok_or(ProductError::StorageUnavailable)?;

        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            let url = storage
                .upload(image)
                .await
                .map_err(|e| ProductError::Upload(e.detail()))?;
            urls.push(url);
        }

        tracing::info!(
            target: "greencart::upload",
            storage = storage.name(),
            count = urls.len(),
            "Stored product images"
        );
        Ok(urls)
    }
}
