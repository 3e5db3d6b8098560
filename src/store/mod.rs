// ============================================================================
// Store - OrderRepository adapters
// ============================================================================
//
// - PgOrderRepository: PostgreSQL via sqlx, one transaction per write
// - InMemoryOrderRepository: single-lock map for tests and local runs
//
// ============================================================================

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOrderRepository;
pub use postgres::PgOrderRepository;
