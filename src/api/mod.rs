//! Client for the graph backend.

mod client;
mod error;

pub use client::{ApiClient, EntityKind, EntityOption};
pub use error::ApiError;
