//! Outcome of a single resource call

use hyper::StatusCode;

/// Result of a resource capability call: success flag, HTTP code and a
/// message that is only meaningful on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub success: bool,
    pub code: u16,
    pub message: String,
}

impl Status {
    /// Successful outcome; the payload will be rendered as XML.
    pub const fn success(code: u16) -> Self {
        Self {
            success: true,
            code,
            message: String::new(),
        }
    }

    /// Failed outcome with a caller-supplied message.
    pub fn fail(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
        }
    }

    /// Failed outcome whose message is `"<code> <reason phrase>"`.
    ///
    /// Codes without a registered reason phrase keep an empty phrase,
    /// e.g. `"599 "`.
    pub fn fail_simple(code: u16) -> Self {
        Self::fail(code, format!("{code} {}", reason_phrase(code)))
    }
}

/// Standard reason phrase for a status code, empty when unknown
pub fn reason_phrase(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_message() {
        let status = Status::success(200);
        assert!(status.success);
        assert_eq!(status.code, 200);
        assert!(status.message.is_empty());
    }

    #[test]
    fn test_fail_keeps_message() {
        let status = Status::fail(409, "campaign already exists");
        assert!(!status.success);
        assert_eq!(status.code, 409);
        assert_eq!(status.message, "campaign already exists");
    }

    #[test]
    fn test_fail_simple_uses_reason_phrase() {
        assert_eq!(Status::fail_simple(405).message, "405 Method Not Allowed");
        assert_eq!(Status::fail_simple(404).message, "404 Not Found");
        assert_eq!(
            Status::fail_simple(500).message,
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_fail_simple_unknown_code() {
        let status = Status::fail_simple(599);
        assert!(!status.success);
        assert_eq!(status.message, "599 ");
    }
}
