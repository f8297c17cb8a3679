//! # HTTP Server
//!
//! Serves the account routes over axum.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::routes::{account_routes, AccountState};
use crate::account::ServiceConfig;
use crate::observability::{Event, Logger};

/// HTTP Server for the envelope transport
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Server over an in-memory store
    pub fn new(config: HttpServerConfig, service_config: ServiceConfig) -> Self {
        Self::with_state(config, Arc::new(AccountState::in_memory(service_config)))
    }

    /// Server over caller-provided state
    pub fn with_state(config: HttpServerConfig, state: Arc<AccountState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<AccountState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        account_routes(state).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process stops
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::event(Event::Serving, &[("addr", addr.to_string().as_str())]);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), ServiceConfig::default());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_router_builds_without_origins() {
        let config = HttpServerConfig {
            cors_origins: Vec::new(),
            ..Default::default()
        };
        let _router = HttpServer::new(config, ServiceConfig::default()).router();
    }
}
