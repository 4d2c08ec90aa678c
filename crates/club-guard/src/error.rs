use crate::config::ConfigError;
use crate::submission::SubmissionRejection;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failures surfaced to the hosting application.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Rejected(SubmissionRejection),
    /// A replayed attempt whose offset lands outside the representable time range.
    OffsetOutOfRange { row: usize, elapsed_ms: u64 },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid form JSON: {}", err),
            AppError::Csv(err) => write!(f, "invalid attempts CSV: {}", err),
            AppError::Rejected(err) => write!(f, "submission rejected: {}", err),
            AppError::OffsetOutOfRange { row, elapsed_ms } => write!(
                f,
                "attempt on row {} has elapsed_ms {} outside the supported time range",
                row, elapsed_ms
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Rejected(err) => Some(err),
            AppError::OffsetOutOfRange { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<SubmissionRejection> for AppError {
    fn from(value: SubmissionRejection) -> Self {
        Self::Rejected(value)
    }
}
