//! Product bodies and catalog query parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use greencart::{
    services::catalog::parse_tags, Pagination, Product, ProductFilter, ProductWithSeller,
    SellerSummary, SustainabilityTag,
};

use crate::application::ProductInput;

/// Catalog filters; they all combine with AND
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of the title or description
    pub search: Option<String>,
    /// `organic,handmade`, `organic handmade` or `["organic","handmade"]`
    pub tags: Option<String>,
    pub category: Option<String>,
    /// Seller's city
    pub city: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        ProductFilter::from_query(
            query.search,
            query.tags.as_deref(),
            query.category,
            query.city,
            query.page,
            query.limit,
        )
    }
}

/// Tags may arrive as a JSON list or as one separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Text(String),
}

impl TagsField {
    pub fn into_tags(self) -> Vec<SustainabilityTag> {
        match self {
            TagsField::List(words) => {
                let mut tags = Vec::new();
                for tag in words.iter().flat_map(|w| parse_tags(w)) {
                    if !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
                tags
            }
            TagsField::Text(text) => parse_tags(&text),
        }
    }
}

/// JSON form of a product create/update; multipart forms carry the same fields
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    #[schema(value_type = Option<Vec<String>>, example = json!(["organic", "handmade"]))]
    pub sustainability_tags: Option<TagsField>,
    pub is_active: Option<bool>,
}

impl From<ProductRequest> for ProductInput {
    fn from(req: ProductRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price: req.price,
            category: req.category,
            stock: req.stock,
            sustainability_tags: req.sustainability_tags.map(TagsField::into_tags),
            is_active: req.is_active,
            invalid: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummaryResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub city: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SellerSummary> for SellerSummaryResponse {
    fn from(seller: SellerSummary) -> Self {
        Self {
            id: seller.id,
            username: seller.username,
            email: seller.email,
            city: seller.city,
            profile_image: seller.profile_image,
            created_at: seller.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub images: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub sustainability_tags: Vec<SustainabilityTag>,
    pub seller_id: Uuid,
    /// Present when the seller account still exists and was loaded
    pub seller: Option<SellerSummaryResponse>,
    pub category: Option<String>,
    pub stock: i32,
    pub average_rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            images: product.images,
            sustainability_tags: product.sustainability_tags,
            seller_id: product.seller_id,
            seller: None,
            category: product.category,
            stock: product.stock,
            average_rating: product.average_rating,
            review_count: product.review_count,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductWithSeller> for ProductResponse {
    fn from(item: ProductWithSeller) -> Self {
        let mut response = ProductResponse::from(item.product);
        response.seller = item.seller.map(Into::into);
        response
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PaginationResponse {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl From<Pagination> for PaginationResponse {
    fn from(p: Pagination) -> Self {
        Self {
            total: p.total,
            page: p.page,
            pages: p.pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub products: Vec<ProductResponse>,
}
