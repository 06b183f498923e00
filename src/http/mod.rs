//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file handler: MIME lookup,
//! validators, path translation and response builders.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use path::{translate_path, TranslatedPath};
pub use response::{
    build_error_response, build_file_response, build_html_response, build_not_modified_response,
    build_redirect_response, Body, Validators,
};
