//! HTTP surface for the dashboard.
//!
//! Routes are nested under `/api/`. The router is composable:
//! `classification_router()` returns a `Router` that can be mounted on
//! any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::classification_router;
pub use server::{serve, ServerError};
pub use types::ApiContext;
