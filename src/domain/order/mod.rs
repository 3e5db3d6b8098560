// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (Order, OrderLine, Pagination)
// - Commands (CreateOrder)
// - Errors (OrderError enum)
// - Repository contract (OrderRepository)
// - Service (OrderService)
//
// Storage adapters live in src/store/, the HTTP boundary in src/http/.
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod repository;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use repository::*;
pub use service::*;
