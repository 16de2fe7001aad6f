use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::OrderItem;
use crate::domain::order::models::OrderStatus;
use crate::domain::order::models::ShippingAddress;
use crate::domain::order::ports::OrderRepository;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductId;
use crate::domain::user::models::UserId;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    total_cents: i64,
    status: String,
    address: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price_cents: i64,
}

fn database_error(e: sqlx::Error) -> OrderError {
    OrderError::DatabaseError(e.to_string())
}

fn to_item(row: OrderItemRow) -> Result<OrderItem, OrderError> {
    let quantity = u32::try_from(row.quantity)
        .map_err(|_| OrderError::DatabaseError(format!("invalid quantity {}", row.quantity)))?;

    Ok(OrderItem {
        product_id: ProductId(row.product_id),
        quantity,
        unit_price: Price::from_cents(row.unit_price_cents)?,
    })
}

fn to_order(row: OrderRow, items: Vec<OrderItem>) -> Result<Order, OrderError> {
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

    Ok(Order {
        id: OrderId(row.id),
        user_id: UserId(row.user_id),
        total: Price::from_cents(row.total_cents)?,
        status,
        address: ShippingAddress::new(row.address)?,
        items,
        created_at: row.created_at,
    })
}

/// Quantities as stored in the INTEGER column, checked once for every line.
fn column_quantities(items: &[OrderItem]) -> Result<Vec<(&OrderItem, i32)>, OrderError> {
    items
        .iter()
        .map(|item| {
            i32::try_from(item.quantity)
                .map(|quantity| (item, quantity))
                .map_err(|_| OrderError::InvalidQuantity(item.product_id.to_string()))
        })
        .collect()
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn place(&self, order: Order) -> Result<Order, OrderError> {
        let lines = column_quantities(&order.items)?;
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        for &(item, quantity) in &lines {
            let reserved = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - $2
                WHERE id = $1 AND quantity >= $2
                "#,
            )
            .bind(item.product_id.0)
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

            if reserved.rows_affected() == 0 {
                let name: Option<String> =
                    sqlx::query_scalar("SELECT name FROM products WHERE id = $1")
                        .bind(item.product_id.0)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(database_error)?;

                // Dropping the transaction rolls back earlier reservations.
                return Err(match name {
                    Some(name) => OrderError::InsufficientStock(name),
                    None => OrderError::ProductUnavailable(item.product_id.to_string()),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.0)
        .bind(order.user_id.0)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(order.address.as_str())
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        for &(item, quantity) in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order.id.0)
            .bind(item.product_id.0)
            .bind(quantity)
            .bind(item.unit_price.cents())
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        Ok(order)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, total_cents, status, address, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, product_id, quantity, unit_price_cents
            FROM order_items
            WHERE order_id = ANY($1)
            "#,
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item_row in item_rows {
            let order_id = item_row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(to_item(item_row)?);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                to_order(row, items)
            })
            .collect()
    }
}
