//! Pixstash Storage Library
//!
//! This crate provides the storage abstraction and the local filesystem backend.
//!
//! # Storage key format
//!
//! The namespace is flat: a key is the stored filename itself,
//! `<object_id><extension>`. Keys must be non-empty, must not start with `.`
//! and must not contain `..` or a path separator. Validation is centralized in
//! the `keys` module so every operation applies the same rules.
//!
//! Dot-prefixed names are reserved for in-flight writes (see `staging`).

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod staging;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use staging::{write_exclusive, PublishError};
pub use traits::{ByteStream, ObjectMeta, Storage, StorageError, StorageResult};
