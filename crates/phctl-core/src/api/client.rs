//! API client for the Pi-hole v6 REST API.

use reqwest::{header, Client};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::blocking::BlockingRequest;
use crate::config::Config;
use crate::error::{Error, Step};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const AUTH_PATH: &str = "/api/auth";

const BLOCKING_PATH: &str = "/api/dns/blocking";

/// Header carrying the session ID on authenticated requests
const SID_HEADER: &str = "sid";

#[derive(Serialize)]
struct AuthRequest<'a> {
    password: &'a str,
}

/// API client for one Pi-hole instance.
/// Requests are never retried; the first failure is returned to the caller.
pub struct ApiClient {
    client: Client,
    auth_url: String,
    blocking_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder().timeout(config.timeout);
        if !config.verify_tls {
            warn!(url = %config.base_url, "TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            auth_url: config.endpoint(AUTH_PATH),
            blocking_url: config.endpoint(BLOCKING_PATH),
        })
    }

    /// Exchange the app password for a session
    pub async fn authenticate(&self, password: &str) -> Result<Session, Error> {
        debug!(url = %self.auth_url, "Requesting session ID");

        let response = self
            .client
            .post(&self.auth_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&AuthRequest { password })
            .send()
            .await
            .map_err(|e| Error::network(Step::Authenticate, e.into()))?;

        let response = Self::check_response(response)
            .await
            .map_err(|e| Error::network(Step::Authenticate, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(Step::Authenticate, e.into()))?;

        let session = Session::from_json(&body)?;
        debug!(validity_secs = ?session.validity_secs(), "Session established");
        Ok(session)
    }

    /// Apply a blocking-state change using an authenticated session
    pub async fn set_blocking(
        &self,
        session: &Session,
        request: &BlockingRequest,
    ) -> Result<(), ApiError> {
        debug!(url = %self.blocking_url, blocking = request.blocking, timer = ?request.timer, "Setting blocking state");

        let response = self
            .client
            .post(&self.blocking_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(SID_HEADER, session.sid())
            .json(request)
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        // The body describes the new state; nothing in it is needed beyond the status.
        let body = response.text().await.unwrap_or_default();
        debug!(body = %body, "Blocking state response");
        info!(blocking = request.blocking, timer = ?request.timer, "Blocking state changed");
        Ok(())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
