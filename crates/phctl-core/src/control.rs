//! One invocation: authenticate, then apply exactly one blocking change.

use std::fmt;

use chrono::{DateTime, Duration, Local};
use tracing::info;

use crate::api::ApiClient;
use crate::blocking::{BlockingRequest, DisableMinutes};
use crate::config::Config;
use crate::error::{Error, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Disable(DisableMinutes),
    Enable,
}

impl Action {
    /// Build an action from the two mutually exclusive CLI selectors.
    ///
    /// Minutes are validated here so a bad value never reaches config loading
    /// or the network. Exclusivity itself is enforced by the argument parser;
    /// `disable` wins if both are somehow set.
    pub fn from_selector(disable: Option<i64>, enable: bool) -> Result<Self, Error> {
        match disable {
            Some(minutes) => Ok(Action::Disable(DisableMinutes::new(minutes)?)),
            None => {
                debug_assert!(enable, "one selector is required");
                Ok(Action::Enable)
            }
        }
    }

    fn request(self) -> BlockingRequest {
        match self {
            Action::Disable(minutes) => BlockingRequest::disable(minutes),
            Action::Enable => BlockingRequest::enable(),
        }
    }

    fn step(self) -> Step {
        match self {
            Action::Disable(_) => Step::Disable,
            Action::Enable => Step::Enable,
        }
    }
}

/// What the appliance accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Disabled {
        minutes: u64,
        resumes_at: Option<DateTime<Local>>,
    },
    Enabled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Disabled {
                minutes,
                resumes_at: Some(at),
            } => write!(
                f,
                "Pi-hole disabled for {} minutes (blocking resumes around {}).",
                minutes,
                at.format("%H:%M")
            ),
            Outcome::Disabled { minutes, resumes_at: None } => {
                write!(f, "Pi-hole disabled for {} minutes.", minutes)
            }
            Outcome::Enabled => write!(f, "Pi-hole blocking enabled."),
        }
    }
}

pub async fn run(config: &Config, action: Action) -> Result<Outcome, Error> {
    let client = ApiClient::new(config).map_err(|e| Error::network(Step::Authenticate, e))?;
    let session = client.authenticate(&config.credential).await?;

    client
        .set_blocking(&session, &action.request())
        .await
        .map_err(|e| Error::network(action.step(), e))?;

    let outcome = match action {
        Action::Disable(minutes) => {
            let resumes_at = i64::try_from(minutes.minutes())
                .ok()
                .and_then(Duration::try_minutes)
                .and_then(|d| Local::now().checked_add_signed(d));
            Outcome::Disabled {
                minutes: minutes.minutes(),
                resumes_at,
            }
        }
        Action::Enable => Outcome::Enabled,
    };
    info!(%outcome, "Done");
    Ok(outcome)
}
