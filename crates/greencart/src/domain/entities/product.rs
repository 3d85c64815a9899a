//! Product - Catalog listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{errors::DomainError, value_objects::SustainabilityTag};

/// Product listed by a seller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub images: Vec<String>,
    pub sustainability_tags: Vec<SustainabilityTag>,
    pub seller_id: Uuid,
    pub category: Option<String>,
    pub stock: i32,
    /// Mean of approved review ratings, one decimal
    pub average_rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a product. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub sustainability_tags: Option<Vec<SustainabilityTag>>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    /// Image URLs appended to the existing gallery
    pub new_images: Vec<String>,
}

/// Public seller fields shown next to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub city: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Product joined with its seller (seller may have been removed)
#[derive(Debug, Clone)]
pub struct ProductWithSeller {
    pub product: Product,
    pub seller: Option<SellerSummary>,
}

impl Product {
    /// Create a new active product with no reviews
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seller_id: Uuid,
        title: String,
        description: String,
        price: f64,
        images: Vec<String>,
        sustainability_tags: Vec<SustainabilityTag>,
        category: Option<String>,
        stock: i32,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let product = Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description,
            price,
            images,
            sustainability_tags: dedup_tags(sustainability_tags),
            seller_id,
            category: category.filter(|c| !c.trim().is_empty()),
            stock,
            average_rating: 0.0,
            review_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;
        Ok(product)
    }

    /// Check field constraints; all violations are reported together
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Product title is required");
        }
        if self.description.trim().is_empty() {
            errors.push("Product description is required");
        }
        if !self.price.is_finite() {
            errors.push("Product price is required");
        } else if self.price < 0.0 {
            errors.push("Price cannot be negative");
        }
        if self.stock < 0 {
            errors.push("Stock cannot be negative");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors.join(", ")))
        }
    }

    /// Apply a partial update and re-validate
    ///
    /// Empty strings for title, description and category keep the current value.
    pub fn apply(&mut self, patch: ProductPatch) -> Result<(), DomainError> {
        if let Some(title) = patch.title.filter(|t| !t.trim().is_empty()) {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description.filter(|d| !d.trim().is_empty()) {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(tags) = patch.sustainability_tags {
            self.sustainability_tags = dedup_tags(tags);
        }
        if let Some(category) = patch.category.filter(|c| !c.trim().is_empty()) {
            self.category = Some(category);
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.images.extend(patch.new_images);
        self.updated_at = Utc::now();

        self.validate()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.seller_id == user_id
    }
}

fn dedup_tags(mut tags: Vec<SustainabilityTag>) -> Vec<SustainabilityTag> {
    tags.sort();
    tags.dedup();
    tags
}
