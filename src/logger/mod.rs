//! Logger module
//!
//! Thin wrappers over `tracing` for the server lifecycle, warnings and
//! errors, plus access log lines emitted under the `access` target.

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::routing::RouteTable;
use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log level {level:?}: {source}")]
    Filter { level: String, source: ParseError },

    #[error("logger already initialized: {0}")]
    Init(String),
}

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|source| LoggerError::Filter {
            level: config.level.clone(),
            source,
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, routes: &RouteTable) {
    tracing::info!("Server started, listening on http://{addr}");
    tracing::info!(
        log_level = %config.logging.level,
        access_log = config.logging.access_log,
        format = %config.logging.access_log_format,
        "Logging configured"
    );
    match config.server.workers {
        Some(workers) => tracing::info!("Worker threads: {workers}"),
        None => tracing::info!("Worker threads: default (CPU cores)"),
    }
    for pattern in routes.patterns() {
        tracing::info!("Route registered: {pattern}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("Connection accepted from {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_route_matched(path: &str, pattern: &str) {
    tracing::debug!("Route matched: {path} -> {pattern}");
}

pub fn log_method_not_allowed(method: &hyper::Method, path: &str) {
    tracing::debug!("Method not allowed: {method} {path}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown_started(active: usize) {
    tracing::info!("Shutdown requested, {active} connection(s) still active");
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        tracing::info!("All connections closed, server stopped");
    } else {
        tracing::warn!("Server stopped with {remaining} connection(s) still active");
    }
}
