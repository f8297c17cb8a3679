//! # HTTP Transport
//!
//! Optional axum front end for the account workflows.
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `POST /accounts` - register
//! - `POST /sessions` - credential check
//! - `POST /feedback` - feedback submission
//! - `PATCH /accounts/:id/attributes/:name` - single attribute update

pub mod config;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use routes::{account_routes, status_code, AccountState, HttpAccountService};
pub use server::HttpServer;
