use async_trait::async_trait;

use super::errors::OrderResult;
use super::value_objects::{NewOrder, NewOrderLine, Order, OrderLine, Pagination};

// ============================================================================
// Order Repository - raw access to orders and their lines
// ============================================================================
//
// Implementations hold no business policy. Every write commits before the
// call returns, and multi-statement writes run in a single transaction.
//
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Order with its lines, or `None` when the id is unknown.
    async fn find_by_id(&self, order_id: i32) -> OrderResult<Option<Order>>;

    /// Orders in ascending `order_id` order, restricted to `page`.
    async fn find_all(&self, page: &Pagination) -> OrderResult<Vec<Order>>;

    async fn exists(&self, order_id: i32) -> OrderResult<bool>;

    /// Persist header and lines atomically and return the stored aggregate.
    async fn insert_order(&self, order: NewOrder) -> OrderResult<Order>;

    /// Persist lines for an order the caller has already found.
    async fn insert_lines(
        &self,
        order_id: i32,
        lines: Vec<NewOrderLine>,
    ) -> OrderResult<Vec<OrderLine>>;

    /// Remove the lines, then the header. Returns `false` if there was no order.
    async fn delete_order_cascade(&self, order_id: i32) -> OrderResult<bool>;
}
