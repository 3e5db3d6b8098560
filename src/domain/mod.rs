// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with:
// - Value objects
// - Commands
// - Errors
// - Repository contract
// - Service
//
// This layer knows nothing about HTTP or about a particular database.
//
// ============================================================================

pub mod order;
