use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderLine};

// ============================================================================
// Response Models
// ============================================================================
//
// Wire shapes returned by the HTTP layer. Each one is built from its store
// entity by a plain `From` conversion.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
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
    pub order_details: Vec<OrderLineResponse>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub order_id: i32,
    pub product_id: i32,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub discount: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        Self {
            order_id: line.order_id,
            product_id: line.product_id,
            unit_price: line.unit_price,
            quantity: line.quantity,
            discount: line.discount,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            customer_id: order.customer_id.clone(),
            employee_id: order.employee_id,
            order_date: order.order_date,
            required_date: order.required_date,
            ship_via: order.ship_via,
            freight: order.freight,
            ship_name: order.ship_name.clone(),
            ship_address: order.ship_address.clone(),
            ship_city: order.ship_city.clone(),
            ship_region: order.ship_region.clone(),
            ship_postal_code: order.ship_postal_code.clone(),
            ship_country: order.ship_country.clone(),
            order_details: order.lines.iter().map(OrderLineResponse::from).collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            order_id: 10248,
            customer_id: "VINET".to_string(),
            employee_id: Some(5),
            order_date: NaiveDate::from_ymd_opt(1996, 7, 4)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            required_date: None,
            ship_via: Some(3),
            freight: Some(dec!(32.38)),
            ship_name: Some("Vins et alcools Chevalier".to_string()),
            ship_address: Some("59 rue de l'Abbaye".to_string()),
            ship_city: Some("Reims".to_string()),
            ship_region: None,
            ship_postal_code: Some("51100".to_string()),
            ship_country: Some("France".to_string()),
            lines: vec![OrderLine {
                id: 1,
                order_id: 10248,
                product_id: 11,
                quantity: 12,
                unit_price: dec!(14.00),
                discount: dec!(0),
            }],
        }
    }

    #[test]
    fn test_order_response_projection() {
        let order = sample_order();
        let response = OrderResponse::from(&order);

        assert_eq!(response.order_id, 10248);
        assert_eq!(response.customer_id, "VINET");
        assert_eq!(response.ship_name.as_deref(), Some("Vins et alcools Chevalier"));
        assert_eq!(response.order_details.len(), 1);
        assert_eq!(response.order_details[0].product_id, 11);
        assert_eq!(response.order_details[0].order_id, 10248);
    }

    #[test]
    fn test_order_response_json_shape() {
        let json = serde_json::to_value(OrderResponse::from(&sample_order())).unwrap();

        assert_eq!(json["orderId"], 10248);
        assert_eq!(json["customerId"], "VINET");
        assert_eq!(json["shipAddress"], "59 rue de l'Abbaye");
        assert_eq!(json["orderDate"], "1996-07-04T00:00:00");
        assert!(json["requiredDate"].is_null());
        assert_eq!(json["orderDetails"][0]["unitPrice"], "14.00");
        // Synthetic line ids stay internal.
        assert!(json["orderDetails"][0].get("id").is_none());
    }
}
