//! PostgreSQL order repository.
//!
//! Expects the `orders` / `order_details` tables from `sql/schema.sql`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::config::DatabaseConfig;
use crate::domain::order::{
    NewOrder, NewOrderLine, Order, OrderLine, OrderRepository, OrderResult, Pagination,
};

const ORDER_COLUMNS: &str = "order_id, customer_id, employee_id, order_date, required_date, \
     ship_via, freight, ship_name, ship_address, ship_city, ship_region, \
     ship_postal_code, ship_country";

const LINE_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price, discount";

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized from `config`. Each request acquires its own connection.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self::new(pool))
    }

    /// Reads run in one snapshot so a header is never paired with a half-deleted line set.
    async fn begin_read(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

fn row_to_order(row: &PgRow, lines: Vec<OrderLine>) -> Result<Order, sqlx::Error> {
    Ok(Order {
        order_id: row.try_get("order_id")?,
        customer_id: row.try_get("customer_id")?,
        employee_id: row.try_get("employee_id")?,
        order_date: row.try_get("order_date")?,
        required_date: row.try_get("required_date")?,
        ship_via: row.try_get("ship_via")?,
        freight: row.try_get("freight")?,
        ship_name: row.try_get("ship_name")?,
        ship_address: row.try_get("ship_address")?,
        ship_city: row.try_get("ship_city")?,
        ship_region: row.try_get("ship_region")?,
        ship_postal_code: row.try_get("ship_postal_code")?,
        ship_country: row.try_get("ship_country")?,
        lines,
    })
}

fn row_to_line(row: &PgRow) -> Result<OrderLine, sqlx::Error> {
    Ok(OrderLine {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        discount: row.try_get("discount")?,
    })
}

/// `OFFSET`/`LIMIT` values for a window; a `NULL` limit means no limit.
fn sql_window(page: &Pagination) -> (i64, Option<i64>) {
    let offset = i64::try_from(page.skip).unwrap_or(i64::MAX);
    let limit = page.take.map(|take| i64::try_from(take).unwrap_or(i64::MAX));
    (offset, limit)
}

async fn insert_line_rows(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i32,
    lines: Vec<NewOrderLine>,
) -> Result<Vec<OrderLine>, sqlx::Error> {
    let sql = format!(
        "INSERT INTO order_details (order_id, product_id, quantity, unit_price, discount) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        LINE_COLUMNS
    );

    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let row = sqlx::query(&sql)
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.discount)
            .fetch_one(&mut **tx)
            .await?;
        inserted.push(row_to_line(&row)?);
    }

    Ok(inserted)
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, order_id: i32) -> OrderResult<Option<Order>> {
        let mut tx = self.begin_read().await?;

        let header = sqlx::query(&format!(
            "SELECT {} FROM orders WHERE order_id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(header) = header else {
            tx.commit().await?;
            return Ok(None);
        };

        let lines = sqlx::query(&format!(
            "SELECT {} FROM order_details WHERE order_id = $1 ORDER BY id",
            LINE_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(row_to_line)
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await?;

        Ok(Some(row_to_order(&header, lines)?))
    }

    async fn find_all(&self, page: &Pagination) -> OrderResult<Vec<Order>> {
        let (offset, limit) = sql_window(page);
        let mut tx = self.begin_read().await?;

        let headers = sqlx::query(&format!(
            "SELECT {} FROM orders ORDER BY order_id OFFSET $1 LIMIT $2",
            ORDER_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let ids = headers
            .iter()
            .map(|row| row.try_get::<i32, _>("order_id"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut lines_by_order: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        if !ids.is_empty() {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM order_details WHERE order_id = ANY($1) ORDER BY order_id, id",
                LINE_COLUMNS
            ))
            .bind(ids.as_slice())
            .fetch_all(&mut *tx)
            .await?;

            for row in &rows {
                let line = row_to_line(row)?;
                lines_by_order.entry(line.order_id).or_default().push(line);
            }
        }

        tx.commit().await?;

        let mut orders = Vec::with_capacity(headers.len());
        for (row, order_id) in headers.iter().zip(ids) {
            let lines = lines_by_order.remove(&order_id).unwrap_or_default();
            orders.push(row_to_order(row, lines)?);
        }

        tracing::debug!(offset, limit = ?limit, count = orders.len(), "Loaded orders");
        Ok(orders)
    }

    async fn exists(&self, order_id: i32) -> OrderResult<bool> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE order_id = $1)")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found)
    }

    async fn insert_order(&self, order: NewOrder) -> OrderResult<Order> {
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query(&format!(
            "INSERT INTO orders (customer_id, employee_id, order_date, required_date, ship_via, \
             freight, ship_name, ship_address, ship_city, ship_region, ship_postal_code, ship_country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(&order.customer_id)
        .bind(order.employee_id)
        .bind(order.order_date)
        .bind(order.required_date)
        .bind(order.ship_via)
        .bind(order.freight)
        .bind(&order.ship_name)
        .bind(&order.ship_address)
        .bind(&order.ship_city)
        .bind(&order.ship_region)
        .bind(&order.ship_postal_code)
        .bind(&order.ship_country)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: i32 = header.try_get("order_id")?;
        let lines = insert_line_rows(&mut tx, order_id, order.lines).await?;

        // Dropping the transaction on any earlier `?` rolls back header and lines together.
        tx.commit().await?;

        tracing::debug!(order_id, line_count = lines.len(), "Inserted order aggregate");
        Ok(row_to_order(&header, lines)?)
    }

    async fn insert_lines(
        &self,
        order_id: i32,
        lines: Vec<NewOrderLine>,
    ) -> OrderResult<Vec<OrderLine>> {
        let mut tx = self.pool.begin().await?;
        let inserted = insert_line_rows(&mut tx, order_id, lines).await?;
        tx.commit().await?;

        tracing::debug!(order_id, line_count = inserted.len(), "Inserted order lines");
        Ok(inserted)
    }

    async fn delete_order_cascade(&self, order_id: i32) -> OrderResult<bool> {
        let mut tx = self.pool.begin().await?;

        let lines_deleted = sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let orders_deleted = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if orders_deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(order_id, lines_deleted, "Deleted order aggregate");
        Ok(true)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
