//! HTTP response building module
//!
//! Builders for the responses the server writes itself (routing errors,
//! resource results, plain text handlers).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=UTF-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";
const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Methods a resource endpoint answers
pub const RESOURCE_ALLOW: &str = "GET, POST";

/// Headers written on every resource response, success or failure
fn with_resource_headers(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Cache-Control", "no-cache")
        .header("Vary", "Accept-Encoding,User-Agent")
}

/// Build the response for a resource call
///
/// `allow` adds an `Allow` header, used when the verb was not dispatched.
pub fn build_resource_response(
    status: StatusCode,
    content_type: &str,
    body: String,
    allow: bool,
) -> Response<Full<Bytes>> {
    let mut builder = with_resource_headers(Response::builder())
        .status(status)
        .header("Content-Type", content_type);
    if allow {
        builder = builder.header("Allow", RESOURCE_ALLOW);
    }

    builder.body(Full::new(Bytes::from(body))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a 500 for a resource whose result could not be rendered
///
/// The resource headers stay; the body is the error text.
pub fn build_resource_error_response(message: &str) -> Response<Full<Bytes>> {
    with_resource_headers(Response::builder())
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(format!("{message}\n"))))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain text response
pub fn build_text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .body(Full::new(body.into()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from("404 page not found\n")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 page not found\n")))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 301 redirect to the subtree root of a registered pattern
pub fn build_moved_permanently(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", target)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(format!(
            "<a href=\"{target}\">Moved Permanently</a>.\n"
        ))))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
