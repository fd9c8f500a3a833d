pub mod delete;
pub mod files;
pub mod health;
pub mod root;
pub mod stats;
pub mod upload;
