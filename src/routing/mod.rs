//! Routing module
//!
//! Explicit route table built at startup and handed to the server:
//! - Subtree patterns (`/campaign/`) match by prefix
//! - Exact patterns match a single path
//! - Longest pattern wins

mod table;

pub use table::{RouteError, RouteMatch, RouteTable};
