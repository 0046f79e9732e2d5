//! Caller-visible errors of the engine.
//!
//! Calculators never fail; degenerate input collapses to zero. The only
//! errors a caller sees are a request the dispatcher cannot route and a
//! configuration that cannot be loaded.

use thiserror::Error;

/// Error type for engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The record has no usable `practice_code`, or it names no calculator.
    #[error("{message}")]
    InvalidRequest { message: String, practice_code: Option<String> },

    /// Configuration or load-rate table could not be loaded.
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },
}

impl EngineError {
    /// Missing, empty or non-text `practice_code`.
    pub fn empty_request() -> Self {
        Self::InvalidRequest { message: "Empty or invalid request body.".to_string(), practice_code: None }
    }

    /// `practice_code` whose primary segment is not registered.
    pub fn invalid_practice_code(code: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: "Invalid `practice_code` parameter.".to_string(),
            practice_code: Some(code.into()),
        }
    }

    /// Create a configuration error for a named setting.
    pub fn configuration(setting: &str, message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), setting: Some(setting.to_string()) }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::InvalidRequest { .. } => "invalid_request",
            EngineError::Configuration { .. } => "configuration",
        }
    }

    /// HTTP-style status a boundary layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::InvalidRequest { .. } => 400,
            EngineError::Configuration { .. } => 500,
        }
    }

    /// Whether the caller can fix the error by changing the request.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<bmp_calculator::LoadRateError> for EngineError {
    fn from(err: bmp_calculator::LoadRateError) -> Self {
        Self::configuration("load_rates.path", err.to_string())
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
