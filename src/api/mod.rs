//! Budget Mapper API Server module
//!
//! Provides the HTTP upload/preview/download surface.
//! Run with `budget-mapper serve` or `budget-mapper-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig};
