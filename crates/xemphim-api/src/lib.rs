//! Typed client for the xemphim storefront backend.
//!
//! Every endpoint the storefront consumes is reachable through the
//! [`Backend`] trait; [`ApiClient`] is the HTTP implementation.

pub mod client;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use client::{ApiClient, StaticToken, TokenSource};
pub use error::ApiError;
pub use traits::Backend;
