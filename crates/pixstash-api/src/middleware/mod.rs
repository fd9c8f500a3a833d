//! Service-wide HTTP middleware

pub mod json_errors;

pub use json_errors::json_error_middleware;
