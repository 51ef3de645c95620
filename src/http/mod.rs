//! HTTP protocol layer module
//!
//! Form parsing and response builders shared by the router and the
//! resource dispatcher.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::Form;
pub use response::{
    build_400_response, build_404_response, build_413_response, build_moved_permanently,
    build_resource_error_response, build_resource_response, build_text_response,
    TEXT_CONTENT_TYPE, XML_CONTENT_TYPE,
};
