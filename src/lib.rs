//! Resources over HTTP with XML serialization
//!
//! A [`resource::Resource`] exposes one capability per HTTP verb. The
//! [`resource::XmlHandler`] dispatcher renders successful replies as XML and
//! failures as plain text, and [`routing::RouteTable`] maps URL patterns to
//! handlers before the server starts.

pub mod api;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resource;
pub mod routing;
pub mod server;
