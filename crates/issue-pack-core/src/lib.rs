pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod github;
pub mod link;
pub mod package;
pub mod payload;
pub mod repo;
pub mod request;
pub mod service;
pub mod status;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{IssuePackError, Result};

/// Version stamped into packages and the rendered issue body.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
