//! XML dispatcher
//!
//! Calls the capability matching the request verb and renders the reply.

use super::{Reply, Resource, ResourceRequest, Status};
use crate::handler::Handler;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use quick_xml::errors::serialize::SeError;
use serde::Serialize;
use thiserror::Error;

/// Failures while turning a reply into a response
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Serialize(#[from] SeError),

    #[error("invalid status code {0}")]
    InvalidStatus(u16),
}

/// Serves a [`Resource`], rendering success payloads as XML
pub struct XmlHandler<R> {
    resource: R,
}

impl<R: Resource> XmlHandler<R> {
    pub const fn new(resource: R) -> Self {
        Self { resource }
    }

    fn call(&self, req: &Request<Bytes>) -> (Reply<R::Payload>, bool) {
        let request = ResourceRequest::new(req);
        match *req.method() {
            Method::GET => (self.resource.get(&request), false),
            Method::POST => (self.resource.post(&request), false),
            ref other => {
                logger::log_method_not_allowed(other, req.uri().path());
                ((Status::fail_simple(405), None), true)
            }
        }
    }
}

impl<R: Resource> Handler for XmlHandler<R> {
    fn serve(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let ((status, payload), undispatched) = self.call(req);

        match render(&status, payload.as_ref()) {
            Ok((code, content_type, body)) => {
                http::build_resource_response(code, content_type, body, undispatched)
            }
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to render {} {}: {e}",
                    req.method(),
                    req.uri().path()
                ));
                http::build_resource_error_response(&e.to_string())
            }
        }
    }
}

/// Status code, content type and body for a reply
fn render<T: Serialize>(
    status: &Status,
    payload: Option<&T>,
) -> Result<(StatusCode, &'static str, String), DispatchError> {
    let (content_type, body) = if status.success {
        let body = match payload {
            Some(value) => quick_xml::se::to_string(value)?,
            None => String::new(),
        };
        (http::XML_CONTENT_TYPE, body)
    } else {
        (http::TEXT_CONTENT_TYPE, status.message.clone())
    };

    let code =
        StatusCode::from_u16(status.code).map_err(|_| DispatchError::InvalidStatus(status.code))?;
    Ok((code, content_type, body))
}
