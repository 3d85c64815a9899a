//! Bulk maintenance used by the seed tool

use sqlx::PgPool;

use greencart::DomainError;

use super::db_error;

/// Row counts per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub reviews: i64,
}

pub struct PgMaintenance {
    pool: PgPool,
}

impl PgMaintenance {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self) -> Result<TableCounts, DomainError> {
        let count = |table: &'static str| {
            let pool = self.pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(&pool)
                    .await
                    .map_err(db_error)
            }
        };

        Ok(TableCounts {
            users: count("users").await?,
            products: count("products").await?,
            orders: count("orders").await?,
            reviews: count("reviews").await?,
        })
    }

    /// Delete every row from every table; returns the counts before deletion
    pub async fn clear_all(&self) -> Result<TableCounts, DomainError> {
        let before = self.counts().await?;

        sqlx::query(
            "TRUNCATE reviews, order_items, orders, cart_items, products, seller_profiles, users",
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(before)
    }
}
