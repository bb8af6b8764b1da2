/// REST client for the FlowrSpot API.
///
/// This module handles:
/// - The shared `ApiClient` wrapper and response normalization (client.rs)
/// - The cloneable error taxonomy (error.rs)
/// - Wire types for every resource (models.rs)
/// - Per-resource request functions (auth.rs, flowers.rs, sightings.rs,
///   comments.rs)

pub mod auth;
pub mod client;
pub mod comments;
pub mod error;
pub mod flowers;
pub mod models;
pub mod sightings;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
