//! HTTP client for the Pi-hole control API.
//!
//! Two endpoints are used: `POST /api/auth` trades the app password for a
//! session ID, and `POST /api/dns/blocking` changes the blocking state with
//! that session ID in the `sid` header.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
