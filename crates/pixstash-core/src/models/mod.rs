//! Data models for the application
//!
//! Domain types for stored objects plus the JSON bodies returned by the HTTP
//! surface.

mod listing;
mod object;

pub use listing::*;
pub use object::*;
