//! PostgreSQL implementation of OrderRepository
//!
//! `place_order` runs in a single transaction: guarded stock decrements,
//! order and item inserts, then the cart wipe.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use greencart::{DomainError, Order, OrderItem, OrderRepository};

use super::{db_error, parse_column};

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    buyer_id: Uuid,
    total_amount: f64,
    status: String,
    payment_status: String,
    payment_method: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            buyer_id: self.buyer_id,
            items,
            total_amount: self.total_amount,
            status: parse_column("status", &self.status)?,
            payment_status: parse_column("payment_status", &self.payment_status)?,
            payment_method: self.payment_method,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Option<Uuid>,
    product_title: String,
    seller_id: Uuid,
    quantity: i32,
    price: f64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_title: row.product_title,
            seller_id: row.seller_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

impl PgOrderRepository {
    async fn items_for(&self, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<OrderItem>>, DomainError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, product_id, product_title, seller_id, quantity, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place_order(&self, order: &Order) -> Result<Order, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Lock product rows in a stable order
        let mut decrements: Vec<&OrderItem> = order.items.iter().collect();
        decrements.sort_by_key(|item| item.product_id);

        for item in decrements {
            let product_id = item.product_id.ok_or_else(|| {
                DomainError::Validation(format!("Order item {} has no product", item.product_title))
            })?;

            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $2, updated_at = NOW()
                WHERE id = $1 AND is_active = TRUE AND stock >= $2
                "#,
            )
            .bind(product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            if updated.rows_affected() == 0 {
                // dropping `tx` rolls back earlier decrements
                return Err(DomainError::Conflict(format!(
                    "Stock for \"{}\" changed during checkout",
                    item.product_title
                )));
            }
        }

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (id, buyer_id, total_amount, status, payment_status,
                                payment_method, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.buyer_id)
        .bind(order.total_amount)
        .bind(order.status.to_string())
        .bind(order.payment_status.to_string())
        .bind(&order.payment_method)
        .bind(order.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        let mut items = Vec::with_capacity(order.items.len());
        for (position, item) in order.items.iter().enumerate() {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r#"
                INSERT INTO order_items (id, order_id, position, product_id, product_title,
                                         seller_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, order_id, product_id, product_title, seller_id, quantity, price
                "#,
            )
            .bind(item.id)
            .bind(order.id)
            .bind(position as i32)
            .bind(item.product_id)
            .bind(&item.product_title)
            .bind(item.seller_id)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;
            items.push(item_row.into());
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(order.buyer_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        row.into_order(items)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self
            .items_for(&[row.id])
            .await?
            .remove(&row.id)
            .unwrap_or_default();
        row.into_order(items).map(Some)
    }

    async fn find_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }
}
