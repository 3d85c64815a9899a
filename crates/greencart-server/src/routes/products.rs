//! Product Routes
//!
//! Catalog reads are public. Creating, editing and removing listings
//! requires a seller or admin; edits are further limited to the owner.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Router,
};
use uuid::Uuid;

use greencart::{ProductFilter, Role};

use crate::{
    auth::CurrentUser,
    error::{ApiError, ErrorResponse},
    extract::{AppPath, AppQuery},
    models::{
        ApiResponse, ProductListResponse, ProductQuery, ProductRequest, ProductResponse,
        ProductsResponse,
    },
    upload::{ProductForm, MAX_PRODUCT_BODY_BYTES},
    AppState,
};

const SELLER_ROLES: &[Role] = &[Role::Seller, Role::Admin];

/// Search the catalog
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching active products, newest first", body = ProductListResponse),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> Result<ApiResponse<ProductListResponse>, ApiError> {
    let filter = ProductFilter::from(query);
    let (products, pagination) = state.product_service.list(&filter).await?;

    Ok(ApiResponse::ok(ProductListResponse {
        products: products.into_iter().map(Into::into).collect(),
        pagination: pagination.into(),
    }))
}

/// Get a product with its seller
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<ProductResponse>, ApiError> {
    let product = state.product_service.get(id).await?;
    Ok(ApiResponse::ok(product.into()))
}

/// Active products of one seller
#[utoipa::path(
    get,
    path = "/api/products/seller/{seller_id}",
    params(("seller_id" = Uuid, Path, description = "Seller user ID")),
    responses(
        (status = 200, description = "Seller's active products", body = ProductsResponse)
    ),
    tag = "Products"
)]
pub async fn products_by_seller(
    State(state): State<AppState>,
    AppPath(seller_id): AppPath<Uuid>,
) -> Result<ApiResponse<ProductsResponse>, ApiError> {
    let products = state.product_service.by_seller(seller_id).await?;
    Ok(ApiResponse::ok(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// Create a product (multipart with `images`, or JSON)
#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = ProductRequest, description = "JSON body, or multipart/form-data with the same fields plus up to 5 `images`"),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation or upload error", body = ErrorResponse),
        (status = 403, description = "Not a seller", body = ErrorResponse),
        (status = 503, description = "Image storage not configured", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    current: CurrentUser,
    form: ProductForm,
) -> Result<(StatusCode, ApiResponse<ProductResponse>), ApiError> {
    current.require_role(SELLER_ROLES)?;

    let product = state
        .product_service
        .create(&current.0, form.input, form.images)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(product.into())))
}

/// Update a product; new images are appended
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content = ProductRequest, description = "JSON body, or multipart/form-data with the same fields plus up to 5 `images`"),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation or upload error", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath(id): AppPath<Uuid>,
    form: ProductForm,
) -> Result<ApiResponse<ProductResponse>, ApiError> {
    current.require_role(SELLER_ROLES)?;

    let product = state
        .product_service
        .update(&current.0, id, form.input, form.images)
        .await?;
    Ok(ApiResponse::ok(product.into()))
}

/// Remove a product from the catalog (it stays in order history)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    current.require_role(SELLER_ROLES)?;

    state.product_service.deactivate(&current.0, id).await?;
    Ok(ApiResponse::ok(serde_json::json!({})).with_message("Product deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/seller/:seller_id", get(products_by_seller))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(MAX_PRODUCT_BODY_BYTES))
}
