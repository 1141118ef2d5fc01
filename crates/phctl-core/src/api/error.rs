use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized (HTTP {status}) - check app_password")]
    Unauthorized { status: StatusCode, body: String },

    #[error("Access denied (HTTP {status})")]
    AccessDenied { status: StatusCode, body: String },

    #[error("Endpoint not found (HTTP {status}) - check the Pi-hole url")]
    NotFound { status: StatusCode, body: String },

    #[error("Rate limited (HTTP {status})")]
    RateLimited { status: StatusCode, body: String },

    #[error("Server error (HTTP {status})")]
    ServerError { status: StatusCode, body: String },

    #[error("Unexpected response (HTTP {status})")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid printing excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized { status, body },
            403 => ApiError::AccessDenied { status, body },
            404 => ApiError::NotFound { status, body },
            429 => ApiError::RateLimited { status, body },
            500..=599 => ApiError::ServerError { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// Response body, when the appliance sent a non-empty one
    pub fn response_body(&self) -> Option<&str> {
        let body = match self {
            ApiError::Unauthorized { body, .. }
            | ApiError::AccessDenied { body, .. }
            | ApiError::NotFound { body, .. }
            | ApiError::RateLimited { body, .. }
            | ApiError::ServerError { body, .. }
            | ApiError::UnexpectedStatus { body, .. } => body.as_str(),
            ApiError::Network(_) => return None,
        };
        (!body.trim().is_empty()).then_some(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        let cases = [
            (401, "Unauthorized"),
            (403, "Access denied"),
            (404, "Endpoint not found"),
            (429, "Rate limited"),
            (502, "Server error"),
            (418, "Unexpected response"),
        ];
        for (code, prefix) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            let err = ApiError::from_status(status, "body");
            assert!(err.to_string().starts_with(prefix), "{code}: {err}");
            assert!(err.to_string().contains(&code.to_string()));
            assert_eq!(err.response_body(), Some("body"));
        }
    }

    #[test]
    fn test_empty_body_is_none() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "  ");
        assert_eq!(err.response_body(), None);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("(truncated, {} total bytes)", long.len())));

        // Never split a multi-byte character
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(ApiError::truncate_body(&wide).contains("truncated"));
    }
}
