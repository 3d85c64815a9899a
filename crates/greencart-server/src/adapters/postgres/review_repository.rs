//! PostgreSQL implementation of ReviewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use greencart::{DomainError, Review, ReviewDetails, ReviewRepository};

use super::db_error;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_DETAILS: &str = r#"
    SELECT r.*,
           u.username AS buyer_username,
           u.profile_image AS buyer_profile_image,
           p.title AS product_title,
           p.images AS product_images
    FROM reviews r
    JOIN users u ON u.id = r.buyer_id
    JOIN products p ON p.id = r.product_id
"#;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    product_id: Uuid,
    seller_id: Uuid,
    buyer_id: Uuid,
    order_id: Uuid,
    rating: i32,
    comment: String,
    is_approved: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            seller_id: row.seller_id,
            buyer_id: row.buyer_id,
            order_id: row.order_id,
            rating: row.rating,
            comment: row.comment,
            is_approved: row.is_approved,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewDetailsRow {
    #[sqlx(flatten)]
    review: ReviewRow,
    buyer_username: String,
    buyer_profile_image: Option<String>,
    product_title: String,
    product_images: Vec<String>,
}

impl From<ReviewDetailsRow> for ReviewDetails {
    fn from(row: ReviewDetailsRow) -> Self {
        Self {
            review: row.review.into(),
            buyer_username: row.buyer_username,
            buyer_profile_image: row.buyer_profile_image,
            product_title: row.product_title,
            product_images: row.product_images,
        }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        let row = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn exists(
        &self,
        buyer_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reviews
                WHERE buyer_id = $1 AND order_id = $2 AND product_id = $3
            )
            "#,
        )
        .bind(buyer_id)
        .bind(order_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn insert(&self, review: &Review) -> Result<Review, DomainError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (id, product_id, seller_id, buyer_id, order_id, rating,
                                 comment, is_approved, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.product_id)
        .bind(review.seller_id)
        .bind(review.buyer_id)
        .bind(review.order_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.is_approved)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn find_by_product(&self, product_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError> {
        let rows = sqlx::query_as::<_, ReviewDetailsRow>(&format!(
            "{SELECT_DETAILS} WHERE r.product_id = $1 AND r.is_approved = TRUE ORDER BY r.created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_seller(&self, seller_id: Uuid) -> Result<Vec<ReviewDetails>, DomainError> {
        let rows = sqlx::query_as::<_, ReviewDetailsRow>(&format!(
            "{SELECT_DETAILS} WHERE r.seller_id = $1 AND r.is_approved = TRUE ORDER BY r.created_at DESC"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn approved_ratings_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<i32>, DomainError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT rating FROM reviews WHERE product_id = $1 AND is_approved = TRUE",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn approved_ratings_for_seller(&self, seller_id: Uuid) -> Result<Vec<i32>, DomainError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT rating FROM reviews WHERE seller_id = $1 AND is_approved = TRUE",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
