//! Route table module
//!
//! Maps URL patterns to handlers. A pattern ending in `/` owns its whole
//! subtree; any other pattern matches only that exact path. The longest
//! matching pattern wins.

use crate::handler::Handler;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route pattern must start with '/': {0:?}")]
    InvalidPattern(String),

    #[error("multiple registrations for {0}")]
    Duplicate(String),
}

/// Outcome of resolving a request path
pub enum RouteMatch<'a> {
    /// Registered handler and the pattern it was registered under
    Handler {
        pattern: &'a str,
        handler: &'a dyn Handler,
    },
    /// Path names a subtree root without its trailing slash
    Redirect(String),
    NotFound,
}

struct RouteEntry {
    pattern: String,
    handler: Arc<dyn Handler>,
}

/// Explicit pattern → handler table built before the server starts
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `pattern`
    pub fn handle<H>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError>
    where
        H: Handler + 'static,
    {
        if !pattern.starts_with('/') {
            return Err(RouteError::InvalidPattern(pattern.to_string()));
        }
        if self.entries.iter().any(|e| e.pattern == pattern) {
            return Err(RouteError::Duplicate(pattern.to_string()));
        }

        self.entries.push(RouteEntry {
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        // Longest first so the first hit is the most specific one
        self.entries
            .sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        Ok(self)
    }

    /// Find the handler for `path`
    ///
    /// A path naming a registered subtree without its trailing slash is
    /// redirected, even when a shorter pattern such as `/` would match it.
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        if !path.ends_with('/') && !self.entries.iter().any(|e| e.pattern == path) {
            let subtree = format!("{path}/");
            if self.entries.iter().any(|e| e.pattern == subtree) {
                return RouteMatch::Redirect(subtree);
            }
        }

        match self.entries.iter().find(|e| matches_pattern(&e.pattern, path)) {
            Some(entry) => RouteMatch::Handler {
                pattern: &entry.pattern,
                handler: entry.handler.as_ref(),
            },
            None => RouteMatch::NotFound,
        }
    }

    /// Registered patterns, most specific first
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.patterns()).finish()
    }
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        path.starts_with(pattern)
    } else {
        path == pattern
    }
}
