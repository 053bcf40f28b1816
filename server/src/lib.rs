//! HTTP service for scheduling events: create, fetch, list, update,
//! cancel, reschedule and delete event records stored in PostgreSQL.

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

pub use state::AppState;
