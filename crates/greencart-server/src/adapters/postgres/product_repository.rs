//! PostgreSQL implementation of ProductRepository
//!
//! Listing filters are assembled with `QueryBuilder`; every user-supplied
//! value is bound, substring inputs are LIKE-escaped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use greencart::{
    services::catalog::escape_like, DomainError, Product, ProductFilter, ProductRepository,
    ProductWithSeller, SellerSummary,
};

use super::{db_error, tags_from_db, tags_to_db};

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_WITH_SELLER: &str = r#"
    SELECT p.*,
           u.username AS seller_username,
           u.email AS seller_email,
           u.city AS seller_city,
           u.profile_image AS seller_profile_image,
           u.created_at AS seller_created_at
    FROM products p
    LEFT JOIN users u ON u.id = p.seller_id
"#;

#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: Uuid,
    title: String,
    description: String,
    price: f64,
    images: Vec<String>,
    sustainability_tags: Vec<String>,
    seller_id: Uuid,
    category: Option<String>,
    stock: i32,
    average_rating: f64,
    review_count: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            images: row.images,
            sustainability_tags: tags_from_db(row.sustainability_tags),
            seller_id: row.seller_id,
            category: row.category,
            stock: row.stock,
            average_rating: row.average_rating,
            review_count: row.review_count,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductWithSellerRow {
    #[sqlx(flatten)]
    product: ProductRow,
    seller_username: Option<String>,
    seller_email: Option<String>,
    seller_city: Option<String>,
    seller_profile_image: Option<String>,
    seller_created_at: Option<DateTime<Utc>>,
}

impl From<ProductWithSellerRow> for ProductWithSeller {
    fn from(row: ProductWithSellerRow) -> Self {
        let seller_id = row.product.seller_id;
        let seller = match (row.seller_username, row.seller_created_at) {
            (Some(username), Some(created_at)) => Some(SellerSummary {
                id: seller_id,
                username,
                email: row.seller_email.unwrap_or_default(),
                city: row.seller_city.unwrap_or_default(),
                profile_image: row.seller_profile_image,
                created_at,
            }),
            _ => None,
        };
        Self {
            product: row.product.into(),
            seller,
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE p.is_active = TRUE");

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if !filter.tags.is_empty() {
        qb.push(" AND p.sustainability_tags && ")
            .push_bind(tags_to_db(&filter.tags));
    }

    if let Some(category) = &filter.category {
        qb.push(" AND p.category ILIKE ")
            .push_bind(format!("%{}%", escape_like(category)));
    }

    if let Some(city) = &filter.city {
        qb.push(" AND u.role IN ('seller', 'admin') AND u.city ILIKE ")
            .push_bind(format!("%{}%", escape_like(city)));
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_with_seller(&self, id: Uuid) -> Result<Option<ProductWithSeller>, DomainError> {
        let row = sqlx::query_as::<_, ProductWithSellerRow>(&format!(
            "{SELECT_WITH_SELLER} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn search(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductWithSeller>, i64), DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM products p LEFT JOIN users u ON u.id = p.seller_id",
        );
        push_filters(&mut count_qb, filter);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_WITH_SELLER);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows = qb
            .build_query_as::<ProductWithSellerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find_active_by_seller(
        &self,
        seller_id: Uuid,
    ) -> Result<Vec<ProductWithSeller>, DomainError> {
        let rows = sqlx::query_as::<_, ProductWithSellerRow>(&format!(
            "{SELECT_WITH_SELLER} WHERE p.seller_id = $1 AND p.is_active = TRUE ORDER BY p.created_at DESC"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_active_by_seller(&self, seller_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE seller_id = $1 AND is_active = TRUE",
        )
        .bind(seller_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (id, title, description, price, images, sustainability_tags,
                                  seller_id, category, stock, average_rating, review_count,
                                  is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title, description = EXCLUDED.description,
                price = EXCLUDED.price, images = EXCLUDED.images,
                sustainability_tags = EXCLUDED.sustainability_tags,
                category = EXCLUDED.category, stock = EXCLUDED.stock,
                is_active = EXCLUDED.is_active, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.images)
        .bind(tags_to_db(&product.sustainability_tags))
        .bind(product.seller_id)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.average_rating)
        .bind(product.review_count)
        .bind(product.is_active)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        review_count: i32,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE products SET average_rating = $2, review_count = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(average_rating)
        .bind(review_count)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
