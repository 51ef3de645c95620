//! Form value parsing
//!
//! Collects `application/x-www-form-urlencoded` values from the request body
//! and the URL query string. Body values come first, query values after.

use hyper::body::Bytes;
use hyper::{Method, Request};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered multi-map of form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pairs: Vec<(String, String)>,
}

impl Form {
    /// Parse body and query values of a request.
    ///
    /// Malformed percent-encoding is decoded lossily rather than rejected.
    pub fn parse(req: &Request<Bytes>) -> Self {
        let mut pairs = Vec::new();

        if carries_form_body(req) {
            pairs.extend(
                form_urlencoded::parse(req.body())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }

        if let Some(query) = req.uri().query() {
            pairs.extend(
                form_urlencoded::parse(query.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }

        Self { pairs }
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Only POST, PUT and PATCH bodies with the urlencoded media type are read
fn carries_form_body(req: &Request<Bytes>) -> bool {
    if !matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH) {
        return false;
    }

    req.headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
