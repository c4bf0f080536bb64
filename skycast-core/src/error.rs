use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the fetch pipeline.
///
/// A missing `alerts` payload is deliberately not represented here: absence of
/// alerts means "no active warnings" and is handled in the data model, not as
/// an error.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The city lookup returned a non-success status. The caller should show
    /// a user-facing message and abort the render cycle; there is no retry.
    #[error("Could not find a location matching '{query}'")]
    LocationNotFound { query: String },

    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status we did not expect.
    #[error("{endpoint} request failed with status {status}: {body}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The endpoint answered 200 but the payload did not match its schema.
    #[error("Failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but was missing the data we came for, e.g. an
    /// empty forecast period list.
    #[error("{endpoint} response contained no {what}")]
    MissingData {
        endpoint: &'static str,
        what: &'static str,
    },
}

impl WeatherError {
    pub fn unexpected_status(endpoint: &'static str, status: StatusCode, body: &str) -> Self {
        WeatherError::UnexpectedStatus {
            endpoint,
            status,
            body: truncate_body(body),
        }
    }
}

/// Keep error messages readable when an endpoint returns a large HTML body.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let prefix: String = body.chars().take(MAX).collect();
        format!("{prefix}...")
    } else {
        body.to_string()
    }
}
