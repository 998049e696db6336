//! Custom error types for rup.

use thiserror::Error;

/// Errors that can occur while driving Rancher service upgrades.
#[derive(Error, Debug)]
pub enum RupError {
    /// Transport, HTTP status, or decode failure talking to the API.
    #[error("[{0}] {1}")]
    Api(String, String),

    /// The name is not present in the service directory.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// The server does not currently offer the action on the service.
    #[error("Action {action} is not available on service {service}")]
    ActionUnavailable { action: String, service: String },

    /// An upgrade step was invoked and the invocation failed.
    #[error("Error upgrading service {service} during the {action} action: {cause}")]
    Upgrade {
        action: String,
        service: String,
        cause: String,
    },

    /// The finalize-availability poll ran out of attempts.
    #[error(
        "Timed out waiting for the {action} action on service {service} after {attempts} attempts"
    )]
    FinalizeTimeout {
        action: String,
        service: String,
        attempts: u32,
    },

    /// The service directory could not be built. Fatal at startup.
    #[error("Failed to build service directory: {0}")]
    ServiceMap(String),

    /// The configuration cannot produce a meaningful run.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RupError {
    /// Create an API error tagged with the raising component.
    pub fn api<E: std::fmt::Display>(component: &str, err: E) -> Self {
        RupError::Api(component.to_string(), err.to_string())
    }

    /// Wrap a failed step invocation with its action and service context.
    pub fn upgrade<E: std::fmt::Display>(action: &str, service: &str, err: E) -> Self {
        RupError::Upgrade {
            action: action.to_string(),
            service: service.to_string(),
            cause: err.to_string(),
        }
    }
}
