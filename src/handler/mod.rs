//! Request handler module
//!
//! Defines the [`Handler`] seam every route target implements and the
//! request entry point that reads the body and dispatches through the
//! route table.

pub mod router;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

// Re-export main entry point
pub use router::{handle_request, route};

/// Something that turns a fully read request into a response
pub trait Handler: Send + Sync {
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>>;
}

impl<F> Handler for F
where
    F: Fn(&Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync,
{
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        self(req)
    }
}
