//! Bearer-token authentication for mutating endpoints

pub mod middleware;

pub use middleware::{auth_middleware, AuthState};
