//! Request bodies for `POST /api/dns/blocking`.

use serde::Serialize;
use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Minutes must be a positive integer (got {0}).")]
    NonPositiveMinutes(i64),

    #[error("{0} minutes is too long to express as a timer.")]
    MinutesOutOfRange(i64),
}

/// A validated, strictly positive number of minutes to disable blocking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableMinutes(u64);

impl DisableMinutes {
    pub fn new(minutes: i64) -> Result<Self, ValidationError> {
        if minutes <= 0 {
            return Err(ValidationError::NonPositiveMinutes(minutes));
        }
        let value = minutes as u64;
        if value.checked_mul(SECONDS_PER_MINUTE).is_none() {
            return Err(ValidationError::MinutesOutOfRange(minutes));
        }
        Ok(Self(value))
    }

    pub fn minutes(self) -> u64 {
        self.0
    }

    /// Timer value sent to the appliance
    pub fn as_seconds(self) -> u64 {
        self.0 * SECONDS_PER_MINUTE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingRequest {
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

impl BlockingRequest {
    /// Turn blocking off; the appliance turns it back on once the timer runs out
    pub fn disable(minutes: DisableMinutes) -> Self {
        Self {
            blocking: false,
            timer: Some(minutes.as_seconds()),
        }
    }

    pub fn enable() -> Self {
        Self {
            blocking: true,
            timer: None,
        }
    }
}
