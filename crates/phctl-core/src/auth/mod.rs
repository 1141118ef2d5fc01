//! Session handling for the Pi-hole API.
//!
//! A `Session` is created from the `/api/auth` response and lives for one
//! invocation. It is never written to disk and never refreshed.

pub mod session;

pub use session::{AuthError, AuthResponse, Session};
