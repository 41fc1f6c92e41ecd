//! Web layer for the route planner.
//!
//! Provides the health check and one POST endpoint per planner.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
