use std::time::Duration;

use reqwest::StatusCode;

use crate::config::ProviderId;

/// Why a single provider query produced no address.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {0}")]
    Status(StatusCode),

    /// The body was valid JSON but not an object.
    #[error("response body is not a JSON object")]
    NotAnObject,

    /// The body could not be decoded into an address.
    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The race was settled before this provider could publish.
    #[error("cancelled")]
    Cancelled,
}

/// Errors that can occur while racing providers.
#[derive(thiserror::Error, Debug)]
pub enum RaceError {
    /// No providers were configured.
    #[error("no providers configured")]
    NoProviders,

    /// No provider produced an address before the deadline.
    ///
    /// `failures` lists the providers that failed outright before the deadline;
    /// providers missing from it were still in flight.
    #[error("no provider answered within {after:?}")]
    Timeout {
        after: Duration,
        failures: Vec<(ProviderId, LookupError)>,
    },
}

impl RaceError {
    /// Returns true for the timeout outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RaceError::Timeout { .. })
    }
}
