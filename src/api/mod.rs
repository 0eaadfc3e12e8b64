//! REST API client module for the wardrobe backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to manage clothing items, outfits, and the user account.
//!
//! The API uses JWT bearer token authentication obtained through
//! the /auth/login and /auth/register endpoints.

pub mod client;
pub mod error;

pub use client::{ApiClient, ProcessedImage, DEFAULT_API_URL};
pub use error::ApiError;
