// Application state module
// Configuration and route table shared by every connection

use std::sync::Arc;
use hyper::header::HeaderValue;
use tokio::sync::{watch, Notify};

use super::types::Config;
use crate::logger;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    /// Asks the accept loop to stop
    pub shutdown: Arc<Notify>,
    /// Tells open connections to finish their current request and close
    closing: watch::Sender<bool>,
    /// `Server` header value, absent when `http.server_name` is not a valid header
    server_header: Option<HeaderValue>,
}

impl AppState {
    pub fn new(config: Config, routes: RouteTable) -> Self {
        let server_header = match HeaderValue::from_str(&config.http.server_name) {
            Ok(value) => Some(value),
            Err(_) => {
                logger::log_warning(&format!(
                    "http.server_name {:?} is not a valid header value, Server header disabled",
                    config.http.server_name
                ));
                None
            }
        };

        Self {
            config,
            routes,
            shutdown: Arc::new(Notify::new()),
            closing: watch::channel(false).0,
            server_header,
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }

    pub const fn server_header(&self) -> Option<&HeaderValue> {
        self.server_header.as_ref()
    }

    /// Signal every open connection to shut down gracefully
    pub fn close_connections(&self) {
        self.closing.send_replace(true);
    }

    pub fn subscribe_closing(&self) -> watch::Receiver<bool> {
        self.closing.subscribe()
    }
}

/// Resolves once [`AppState::close_connections`] has been called
pub async fn connections_closing(closing: &mut watch::Receiver<bool>) {
    loop {
        let closed = *closing.borrow_and_update();
        if closed {
            return;
        }
        if closing.changed().await.is_err() {
            // State dropped without closing; nothing left to wait for
            std::future::pending::<()>().await;
        }
    }
}
