use club_guard::config::DispatchConfig;
use club_guard::error::AppError;
use club_guard::SubmissionEnvelope;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Stand-in for a real delivery channel: waits out a fixed delay, then logs the payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoggingTransport {
    delay: Duration,
}

impl LoggingTransport {
    pub(crate) fn new(config: DispatchConfig) -> Self {
        Self {
            delay: config.delay,
        }
    }

    pub(crate) async fn deliver<T: Serialize>(
        &self,
        envelope: &SubmissionEnvelope<T>,
    ) -> Result<String, AppError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        log_envelope(envelope)
    }
}

/// Log the sanitized payload and return the JSON that was logged.
pub(crate) fn log_envelope<T: Serialize>(
    envelope: &SubmissionEnvelope<T>,
) -> Result<String, AppError> {
    let payload = serde_json::to_string(envelope)?;
    info!(form = %envelope.form, %payload, "secure form submission");
    Ok(payload)
}
