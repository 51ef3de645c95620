//! Middleware chain
//!
//! Currently a pass-through; cross-cutting behavior hooks in here.

use crate::handler::Handler;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

/// Handler wrapper forwarding every request to `inner`
pub struct Chain<H> {
    inner: H,
}

/// Wrap a handler in the middleware chain
pub const fn chain<H: Handler>(inner: H) -> Chain<H> {
    Chain { inner }
}

impl<H: Handler> Handler for Chain<H> {
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        self.inner.serve(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http;
    use hyper::StatusCode;

    #[test]
    fn test_chain_passes_through() {
        let handler = chain(|req: &Request<Bytes>| {
            http::build_text_response(StatusCode::ACCEPTED, req.uri().path().to_owned())
        });
        let req = Request::builder()
            .uri("/campaign/42")
            .body(Bytes::new())
            .unwrap();

        let resp = handler.serve(&req);
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }
}
