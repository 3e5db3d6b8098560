use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::{NewOrder, NewOrderLine};

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// Request to create an order together with its initial lines.
///
/// Required fields are optional here so that a missing `customerId` or
/// `orderDetails` is reported as an `InvalidArgument` by the service rather
/// than as a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub customer_id: Option<String>,
    pub employee_id: Option<i32>,
    pub required_date: Option<NaiveDateTime>,
    pub ship_via: Option<i32>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    pub order_details: Option<Vec<NewOrderLine>>,
}

impl CreateOrder {
    /// Check required fields and stamp the order date.
    pub fn into_new_order(self, order_date: NaiveDateTime) -> Result<NewOrder, OrderError> {
        let customer_id = match self.customer_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(OrderError::InvalidArgument(
                    "customerId is required".to_string(),
                ))
            }
        };

        let lines = self.order_details.ok_or_else(|| {
            OrderError::InvalidArgument("orderDetails is required".to_string())
        })?;

        Ok(NewOrder {
            customer_id,
            employee_id: self.employee_id,
            order_date,
            required_date: self.required_date,
            ship_via: self.ship_via,
            freight: self.freight,
            ship_name: self.ship_name,
            ship_address: self.ship_address,
            ship_city: self.ship_city,
            ship_region: self.ship_region,
            ship_postal_code: self.ship_postal_code,
            ship_country: self.ship_country,
            lines,
        })
    }
}
