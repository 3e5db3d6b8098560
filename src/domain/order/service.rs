use std::sync::Arc;

use chrono::Utc;

use super::commands::CreateOrder;
use super::errors::OrderResult;
use super::repository::OrderRepository;
use super::value_objects::{NewOrderLine, Order, OrderLine, Pagination};

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: Request → Validation → Repository
//
// Validation failures are raised before the repository is called. Storage
// failures pass through unchanged.
//
// ============================================================================

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// List orders by ascending id, optionally windowed by `skip`/`take`.
    pub async fn list(&self, skip: Option<i64>, take: Option<i64>) -> OrderResult<Vec<Order>> {
        let page = Pagination::new(skip, take)?;
        let orders = self.repository.find_all(&page).await?;

        tracing::debug!(
            skip = page.skip,
            take = ?page.take,
            returned = orders.len(),
            "Listed orders"
        );

        Ok(orders)
    }

    pub async fn get_by_id(&self, order_id: i32) -> OrderResult<Option<Order>> {
        let order = self.repository.find_by_id(order_id).await?;
        if order.is_none() {
            tracing::debug!(order_id, "Order not found");
        }
        Ok(order)
    }

    /// Create an order and its initial lines in one write.
    pub async fn create(&self, request: CreateOrder) -> OrderResult<Order> {
        let new_order = request.into_new_order(Utc::now().naive_utc())?;

        if new_order.lines.is_empty() {
            tracing::warn!(
                customer_id = %new_order.customer_id,
                "Creating order without any lines"
            );
        }

        let order = self.repository.insert_order(new_order).await?;

        tracing::info!(
            order_id = order.order_id,
            customer_id = %order.customer_id,
            line_count = order.lines.len(),
            "✅ Order created"
        );

        Ok(order)
    }

    /// Append lines to an existing order. `None` when the order does not exist.
    pub async fn add_lines(
        &self,
        order_id: i32,
        lines: Vec<NewOrderLine>,
    ) -> OrderResult<Option<Vec<OrderLine>>> {
        if !self.repository.exists(order_id).await? {
            tracing::debug!(order_id, "Cannot add lines, order not found");
            return Ok(None);
        }

        if lines.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let added = self.repository.insert_lines(order_id, lines).await?;

        tracing::info!(
            order_id,
            line_count = added.len(),
            "✅ Lines added to order"
        );

        Ok(Some(added))
    }

    /// Delete an order and all of its lines. `false` when there was nothing to delete.
    pub async fn delete(&self, order_id: i32) -> OrderResult<bool> {
        let deleted = self.repository.delete_order_cascade(order_id).await?;

        if deleted {
            tracing::info!(order_id, "✅ Order deleted with its lines");
        } else {
            tracing::debug!(order_id, "Nothing to delete, order not found");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
