//! portal-core: shared infrastructure for the fleet portal.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
