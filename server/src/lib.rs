// server/src/lib.rs

//! HTTP surface for the storefront: actix-web routes over the `storefront`
//! services, cookie sessions and JSON error bodies.

pub mod config;
pub mod errors;
pub mod session;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
