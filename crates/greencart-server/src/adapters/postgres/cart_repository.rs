//! PostgreSQL implementation of CartRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use greencart::{CartItem, CartLine, CartRepository, DomainError, Product};

use super::{db_error, ProductRow};

pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn find_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        let items = sqlx::query_as::<_, CartItemRow>(
            "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products: HashMap<Uuid, Product> =
            sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)")
                .bind(&product_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?
                .into_iter()
                .map(|row| {
                    let product = Product::from(row);
                    (product.id, product)
                })
                .collect();

        Ok(items
            .into_iter()
            .map(|row| {
                let product = products.get(&row.product_id).cloned();
                CartLine {
                    item: row.into(),
                    product,
                }
            })
            .collect())
    }

    async fn find_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CartItem>, DomainError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            "SELECT * FROM cart_items WHERE id = $1 AND user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_item_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, DomainError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            "SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn save_item(&self, item: &CartItem) -> Result<CartItem, DomainError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            INSERT INTO cart_items (id, user_id, product_id, quantity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.user_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
