//! In-memory order repository for tests and local development.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::order::{
    NewOrder, NewOrderLine, Order, OrderLine, OrderRepository, OrderResult, Pagination,
};

#[derive(Debug)]
struct MemoryState {
    next_order_id: i32,
    next_line_id: i32,
    /// Keyed by id so iteration is already in ascending id order.
    orders: BTreeMap<i32, Order>,
}

/// In-memory implementation of `OrderRepository`.
///
/// One lock guards orders and lines together, so every call is atomic.
/// Ids start at 1 like a fresh `SERIAL` column.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_order_id: 1,
                next_line_id: 1,
                orders: BTreeMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl InMemoryOrderRepository {
    pub fn len(&self) -> usize {
        self.state().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().orders.is_empty()
    }

    /// Total number of stored lines across all orders.
    pub fn line_count(&self) -> usize {
        self.state().orders.values().map(|o| o.lines.len()).sum()
    }

    /// Lines stored for `order_id`; empty when the order is gone.
    pub fn lines_for(&self, order_id: i32) -> Vec<OrderLine> {
        self.state()
            .orders
            .get(&order_id)
            .map(|o| o.lines.clone())
            .unwrap_or_default()
    }
}

impl MemoryState {
    fn assign_lines(&mut self, order_id: i32, lines: Vec<NewOrderLine>) -> Vec<OrderLine> {
        lines
            .into_iter()
            .map(|line| {
                let id = self.next_line_id;
                self.next_line_id += 1;
                line.into_line(id, order_id)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, order_id: i32) -> OrderResult<Option<Order>> {
        Ok(self.state().orders.get(&order_id).cloned())
    }

    async fn find_all(&self, page: &Pagination) -> OrderResult<Vec<Order>> {
        Ok(page.apply(self.state().orders.values().cloned()))
    }

    async fn exists(&self, order_id: i32) -> OrderResult<bool> {
        Ok(self.state().orders.contains_key(&order_id))
    }

    async fn insert_order(&self, order: NewOrder) -> OrderResult<Order> {
        let mut state = self.state();

        let order_id = state.next_order_id;
        state.next_order_id += 1;
        let lines = state.assign_lines(order_id, order.lines);

        let stored = Order {
            order_id,
            customer_id: order.customer_id,
            employee_id: order.employee_id,
            order_date: order.order_date,
            required_date: order.required_date,
            ship_via: order.ship_via,
            freight: order.freight,
            ship_name: order.ship_name,
            ship_address: order.ship_address,
            ship_city: order.ship_city,
            ship_region: order.ship_region,
            ship_postal_code: order.ship_postal_code,
            ship_country: order.ship_country,
            lines,
        };

        state.orders.insert(order_id, stored.clone());
        Ok(stored)
    }

    async fn insert_lines(
        &self,
        order_id: i32,
        lines: Vec<NewOrderLine>,
    ) -> OrderResult<Vec<OrderLine>> {
        let mut state = self.state();

        // Mirrors the foreign key on order_details.order_id.
        if !state.orders.contains_key(&order_id) {
            return Err(sqlx::Error::RowNotFound.into());
        }

        let added = state.assign_lines(order_id, lines);
        if let Some(order) = state.orders.get_mut(&order_id) {
            order.lines.extend(added.iter().cloned());
        }

        Ok(added)
    }

    async fn delete_order_cascade(&self, order_id: i32) -> OrderResult<bool> {
        Ok(self.state().orders.remove(&order_id).is_some())
    }
}
