use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Persisted order aggregate: the header plus its owned lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i32,
    pub customer_id: String,
    pub employee_id: Option<i32>,
    pub order_date: NaiveDateTime,
    pub required_date: Option<NaiveDateTime>,
    pub ship_via: Option<i32>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    pub lines: Vec<OrderLine>,
}

/// A line item owned by exactly one order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

/// Order header and lines that have not been assigned ids yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: String,
    pub employee_id: Option<i32>,
    pub order_date: NaiveDateTime,
    pub required_date: Option<NaiveDateTime>,
    pub ship_via: Option<i32>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// Line item as supplied by a caller. Product existence is not checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

impl NewOrderLine {
    pub fn into_line(self, id: i32, order_id: i32) -> OrderLine {
        OrderLine {
            id,
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
        }
    }
}

/// Validated window over the id-ordered order sequence. The default window
/// keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub skip: usize,
    /// `None` keeps every remaining order.
    pub take: Option<usize>,
}

impl Pagination {
    /// Build a window from raw query values, rejecting negatives.
    pub fn new(skip: Option<i64>, take: Option<i64>) -> Result<Self, OrderError> {
        let skip = match skip {
            Some(value) => usize::try_from(value).map_err(|_| {
                OrderError::InvalidArgument(format!("skip must not be negative, got {}", value))
            })?,
            None => 0,
        };

        let take = take
            .map(|value| {
                usize::try_from(value).map_err(|_| {
                    OrderError::InvalidArgument(format!("take must not be negative, got {}", value))
                })
            })
            .transpose()?;

        Ok(Self { skip, take })
    }

    /// Apply the window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let remaining = items.into_iter().skip(self.skip);
        match self.take {
            Some(take) => remaining.take(take).collect(),
            None => remaining.collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
