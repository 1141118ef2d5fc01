//! Core library for phctl.
//!
//! Loads the appliance config, authenticates against the Pi-hole HTTP API and
//! issues a single blocking-state change with the resulting session.
//!
//! The binary crate owns the CLI and all user-facing reporting; everything in
//! here returns typed errors instead of terminating the process.

pub mod api;
pub mod auth;
pub mod blocking;
pub mod config;
pub mod control;
pub mod error;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Session};
pub use blocking::{BlockingRequest, DisableMinutes, ValidationError};
pub use config::{Config, ConfigError};
pub use control::{Action, Outcome};
pub use error::{Error, Step};
