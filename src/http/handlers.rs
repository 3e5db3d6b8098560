use std::time::Instant;

use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;

use crate::domain::order::{CreateOrder, NewOrderLine, OrderError, OrderResult, OrderService};
use crate::metrics::{Metrics, Outcome};
use crate::models::{ErrorResponse, OrderLineResponse, OrderResponse};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

/// Record the operation's outcome and latency; storage failures are logged here.
fn observe<T>(
    metrics: &Metrics,
    operation: &str,
    started: Instant,
    result: &OrderResult<T>,
    found: impl FnOnce(&T) -> bool,
) {
    let outcome = match result {
        Ok(value) => {
            if found(value) {
                Outcome::Ok
            } else {
                Outcome::NotFound
            }
        }
        Err(err) => {
            if let OrderError::Storage(source) = err {
                tracing::error!(operation, error = %source, "Order operation failed");
            }
            Outcome::from(err)
        }
    };
    metrics.record_operation(operation, outcome, started.elapsed().as_secs_f64());
}

fn not_found(order_id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: format!("Order {} not found", order_id),
    })
}

pub async fn list_orders(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, OrderError> {
    let started = Instant::now();
    let result = service.list(query.skip, query.take).await;
    observe(&metrics, "list", started, &result, |_| true);

    let orders = result?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn get_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    path: web::Path<i32>,
) -> Result<HttpResponse, OrderError> {
    let order_id = path.into_inner();
    let started = Instant::now();
    let result = service.get_by_id(order_id).await;
    observe(&metrics, "get_by_id", started, &result, Option::is_some);

    match result? {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(&order))),
        None => Ok(not_found(order_id)),
    }
}

pub async fn create_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    body: web::Json<CreateOrder>,
) -> Result<HttpResponse, OrderError> {
    let started = Instant::now();
    let result = service.create(body.into_inner()).await;
    observe(&metrics, "create", started, &result, |_| true);

    let order = result?;
    metrics.record_lines_written(order.lines.len());

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/orders/{}", order.order_id)))
        .json(OrderResponse::from(&order)))
}

pub async fn add_products_to_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    path: web::Path<i32>,
    body: web::Json<Vec<NewOrderLine>>,
) -> Result<HttpResponse, OrderError> {
    let order_id = path.into_inner();
    let started = Instant::now();
    let result = service.add_lines(order_id, body.into_inner()).await;
    observe(&metrics, "add_lines", started, &result, Option::is_some);

    match result? {
        Some(lines) => {
            metrics.record_lines_written(lines.len());
            let body: Vec<OrderLineResponse> = lines.iter().map(OrderLineResponse::from).collect();
            Ok(HttpResponse::Ok().json(body))
        }
        None => Ok(not_found(order_id)),
    }
}

pub async fn delete_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    path: web::Path<i32>,
) -> Result<HttpResponse, OrderError> {
    let order_id = path.into_inner();
    let started = Instant::now();
    let result = service.delete(order_id).await;
    observe(&metrics, "delete", started, &result, |deleted| *deleted);

    if result? {
        Ok(HttpResponse::Ok().finish())
    } else {
        Ok(not_found(order_id))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{NewOrder, OrderRepository};
    use crate::http::configure;
    use crate::store::InMemoryOrderRepository;
    use actix_web::{http::StatusCode, test, App};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn seeded_repository(count: usize) -> Arc<InMemoryOrderRepository> {
        let repo = Arc::new(InMemoryOrderRepository::new());
        for index in 0..count {
            repo.insert_order(NewOrder {
                customer_id: if index == 11 { "ERNSH".to_string() } else { format!("C{:04}", index) },
                employee_id: Some(1),
                order_date: NaiveDate::from_ymd_opt(1996, 7, 4)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                required_date: None,
                ship_via: Some(1),
                freight: None,
                ship_name: None,
                ship_address: None,
                ship_city: None,
                ship_region: None,
                ship_postal_code: None,
                ship_country: None,
                lines: vec![NewOrderLine {
                    product_id: 42,
                    quantity: 1,
                    unit_price: dec!(9.80),
                    discount: dec!(0),
                }],
            })
            .await
            .unwrap();
        }
        repo
    }

    macro_rules! app {
        ($repo:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(OrderService::new($repo.clone())))
                    .app_data(web::Data::new(Metrics::new().unwrap()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_all_orders() {
        let repo = seeded_repository(832).await;
        let app = app!(repo);

        let req = test::TestRequest::get().uri("/orders").to_request();
        let body: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 832);
    }

    #[actix_web::test]
    async fn test_list_with_skip_and_take() {
        let repo = seeded_repository(832).await;
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri("/orders?skip=11&take=200")
            .to_request();
        let body: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 200);
        assert_eq!(body[0].customer_id, "ERNSH");
    }

    #[actix_web::test]
    async fn test_list_negative_window_is_bad_request() {
        let repo = seeded_repository(3).await;
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri("/orders?skip=-1&take=-1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("skip"));
    }

    #[actix_web::test]
    async fn test_list_malformed_query_is_bad_request() {
        let repo = seeded_repository(1).await;
        let app = app!(repo);

        let req = test::TestRequest::get().uri("/orders?take=lots").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_get_order_found_and_missing() {
        let repo = seeded_repository(2).await;
        let app = app!(repo);

        let req = test::TestRequest::get().uri("/orders/1").to_request();
        let body: OrderResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.order_id, 1);
        assert_eq!(body.order_details.len(), 1);

        let req = test::TestRequest::get().uri("/orders/0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_get_order_with_non_numeric_id() {
        let repo = seeded_repository(1).await;
        let app = app!(repo);

        let req = test::TestRequest::get().uri("/orders/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_create_order() {
        let repo = seeded_repository(0).await;
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/orders/create")
            .set_json(serde_json::json!({
                "customerId": "ALFKI",
                "employeeId": 1,
                "requiredDate": "2023-03-30T00:00:00",
                "shipVia": 1,
                "freight": 12.34,
                "shipName": "Ship Name",
                "shipAddress": "Ship Address",
                "shipCity": "Ship City",
                "shipRegion": "Ship Region",
                "shipPostalCode": "12345",
                "shipCountry": "Ship Country",
                "orderDetails": [
                    {"productId": 1, "quantity": 10, "unitPrice": 9.99, "discount": 0}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: OrderResponse = test::read_body_json(resp).await;
        assert_eq!(location, Some(format!("/orders/{}", body.order_id)));
        assert_eq!(body.customer_id, "ALFKI");
        assert_eq!(body.freight, Some(dec!(12.34)));
        assert_eq!(body.order_details.len(), 1);
        assert_eq!(body.order_details[0].quantity, 10);
        assert_eq!(body.order_details[0].unit_price, dec!(9.99));

        let req = test::TestRequest::get()
            .uri(&format!("/orders/{}", body.order_id))
            .to_request();
        let fetched: OrderResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, body);
    }

    #[actix_web::test]
    async fn test_create_order_missing_fields_is_bad_request() {
        let repo = seeded_repository(0).await;
        let app = app!(repo);

        for payload in [
            serde_json::json!({ "orderDetails": [] }),
            serde_json::json!({ "customerId": "ALFKI" }),
            serde_json::json!({ "customerId": "ALFKI", "orderDetails": null }),
        ] {
            let req = test::TestRequest::post()
                .uri("/orders/create")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
        assert!(repo.is_empty());
    }

    #[actix_web::test]
    async fn test_create_order_malformed_body_is_bad_request() {
        let repo = seeded_repository(0).await;
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/orders/create")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_add_products_to_order() {
        let repo = seeded_repository(1).await;
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/orders/1/addproductstoorder")
            .set_json(serde_json::json!([
                {"productId": 3, "quantity": 10, "unitPrice": 9.99, "discount": 0},
                {"productId": 4, "quantity": 20, "unitPrice": 19.99, "discount": 2}
            ]))
            .to_request();
        let body: Vec<OrderLineResponse> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|l| l.order_id == 1));
        assert_eq!(body[0].product_id, 3);
        assert_eq!(body[1].discount, dec!(2));
        assert_eq!(repo.lines_for(1).len(), 3);
    }

    #[actix_web::test]
    async fn test_add_products_to_missing_order() {
        let repo = seeded_repository(1).await;
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/orders/999/addproductstoorder")
            .set_json(serde_json::json!([
                {"productId": 3, "quantity": 10, "unitPrice": 9.99}
            ]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(repo.line_count(), 1);
    }

    #[actix_web::test]
    async fn test_add_products_with_bad_body() {
        let repo = seeded_repository(1).await;
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/orders/1/addproductstoorder")
            .set_json(serde_json::json!([{ "productId": 3 }]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.line_count(), 1);
    }

    #[actix_web::test]
    async fn test_delete_order() {
        let repo = seeded_repository(2).await;
        let app = app!(repo);

        let req = test::TestRequest::delete().uri("/orders/1/delete").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/orders/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(repo.lines_for(1).is_empty());

        let req = test::TestRequest::delete().uri("/orders/1/delete").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(repo.len(), 1);
    }
}
