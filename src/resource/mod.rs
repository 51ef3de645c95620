//! Resource module
//!
//! A resource is an endpoint with one capability per HTTP verb. The
//! [`XmlHandler`] dispatcher turns a resource into a [`Handler`], rendering
//! successful results as XML and failures as plain text.
//!
//! [`Handler`]: crate::handler::Handler

mod chain;
mod dispatch;
mod status;

pub use chain::{chain, Chain};
pub use dispatch::{DispatchError, XmlHandler};
pub use status::{reason_phrase, Status};

use crate::http::Form;
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Request};
use serde::Serialize;

/// Status plus optional payload returned by a capability
pub type Reply<T> = (Status, Option<T>);

/// Capability set of an HTTP resource
///
/// Both capabilities default to `405 Method Not Allowed`, so an
/// implementation only overrides the verbs it supports.
pub trait Resource: Send + Sync {
    /// Value rendered as the XML body on success
    type Payload: Serialize;

    fn get(&self, _req: &ResourceRequest<'_>) -> Reply<Self::Payload> {
        (Status::fail_simple(405), None)
    }

    fn post(&self, _req: &ResourceRequest<'_>) -> Reply<Self::Payload> {
        (Status::fail_simple(405), None)
    }
}

/// Request as seen by a resource, with form values already parsed
pub struct ResourceRequest<'a> {
    inner: &'a Request<Bytes>,
    form: Form,
}

impl<'a> ResourceRequest<'a> {
    pub fn new(inner: &'a Request<Bytes>) -> Self {
        Self {
            inner,
            form: Form::parse(inner),
        }
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Raw query string, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.inner.uri().query()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    pub const fn form(&self) -> &Form {
        &self.form
    }
}
