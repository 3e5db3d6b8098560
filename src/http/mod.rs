// ============================================================================
// HTTP Boundary - actix-web routes for the order service
// ============================================================================
//
// GET    /orders?skip=&take=                    list
// GET    /orders/{orderId}                      get by id
// POST   /orders/create                         create
// POST   /orders/{orderId}/addproductstoorder   add lines
// DELETE /orders/{orderId}/delete               delete
//
// ============================================================================

mod error;
mod handlers;

use actix_web::{error::InternalError, web, HttpResponse};

use crate::models::ErrorResponse;


/// Register the order routes and the extractor configs that turn malformed
/// input into JSON 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        let response = bad_request(format!("Invalid request body: {}", err));
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        let response = bad_request(format!("Invalid query string: {}", err));
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        let response = bad_request(format!("Invalid order id: {}", err));
        InternalError::from_response(err, response).into()
    }))
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::list_orders))
            .route("/create", web::post().to(handlers::create_order))
            .route("/{order_id}", web::get().to(handlers::get_order))
            .route(
                "/{order_id}/addproductstoorder",
                web::post().to(handlers::add_products_to_order),
            )
            .route("/{order_id}/delete", web::delete().to(handlers::delete_order)),
    );
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { error: message })
}
