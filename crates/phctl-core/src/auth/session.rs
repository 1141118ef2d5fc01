use std::fmt;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Failed to retrieve Pi-hole session ID{}. Check app_password in your config file.", reason(message.as_deref()))]
    MissingSessionId { message: Option<String> },

    #[error("Invalid authentication response: {0}")]
    InvalidResponse(String),
}

fn reason(message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({m})"),
        _ => String::new(),
    }
}

/// Body of a `POST /api/auth` response
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub session: Option<SessionBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionBody {
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub validity: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    sid: String,
    validity_secs: Option<i64>,
}

// The sid is a bearer credential: keep it out of logs and panics.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("sid", &"<redacted>")
            .field("validity_secs", &self.validity_secs)
            .finish()
    }
}

impl Session {
    pub fn from_response(response: AuthResponse) -> Result<Self, AuthError> {
        let body = response.session.unwrap_or_default();
        match body.sid {
            Some(sid) if !sid.trim().is_empty() => Ok(Self {
                sid,
                validity_secs: body.validity,
            }),
            _ => Err(AuthError::MissingSessionId {
                message: body.message,
            }),
        }
    }

    /// Parse a raw response body
    pub fn from_json(body: &str) -> Result<Self, AuthError> {
        let response: AuthResponse =
            serde_json::from_str(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Self::from_response(response)
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Seconds the appliance says the session stays valid, if reported
    pub fn validity_secs(&self) -> Option<i64> {
        self.validity_secs
    }
}
