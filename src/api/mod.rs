//! Endpoints served by the application
//!
//! [`routes`] builds the route table handed to the server at startup.

mod campaign;

pub use campaign::{Campaign, Human};

use crate::http;
use crate::resource::{chain, XmlHandler};
use crate::routing::{RouteError, RouteTable};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};

/// Route table for every endpoint of the application
pub fn routes() -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new();
    table
        .handle("/campaign/", chain(XmlHandler::new(Campaign)))?
        .handle("/test/", test_page)?;
    Ok(table)
}

/// Plain handler without the resource layer
fn test_page(_req: &Request<Bytes>) -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "test")
}
