// Zoo & Bear Records API - Core Library
// Exposes the store, handlers and router for the server binary and tests

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod resource;
pub mod security;
pub mod store;

// Re-export commonly used types
pub use api::{create_router, resource_router, AppState};
pub use config::{Config, ConfigError};
pub use db::{Record, StoreError};
pub use error::{ApiError, ErrorBody, MessageBody};
pub use resource::{Operation, ResourceKind};
pub use store::Store;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
