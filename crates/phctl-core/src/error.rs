//! Umbrella error type returned by the orchestration layer.

use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::blocking::ValidationError;
use crate::config::ConfigError;

/// Which request a network failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Authenticate,
    Disable,
    Enable,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Authenticate => "get session ID",
            Step::Disable => "disable Pi-hole",
            Step::Enable => "enable Pi-hole",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("could not {step}: {source}")]
    Network {
        step: Step,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    pub(crate) fn network(step: Step, source: ApiError) -> Self {
        Error::Network { step, source }
    }

    /// Response body returned by the appliance, if the failure carried one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Network { source, .. } => source.response_body(),
            _ => None,
        }
    }
}
