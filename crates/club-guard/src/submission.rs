use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GuardConfig;
use crate::forms::{FieldErrors, FormKind, FormSubmission, ANONYMOUS_IDENTIFIER};
use crate::guard::clock::Clock;
use crate::guard::rate_limit::{RateLimitEntry, RateLimiter};
use crate::guard::sanitize::{sanitize_email, truncate_chars};
use crate::guard::token::{FormToken, TokenIssuer};

pub const MAX_USER_AGENT_CHARS: usize = 200;

/// Why a submission was turned away. Every variant is recoverable by the visitor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionRejection {
    #[error("Invalid form submission. Please refresh and try again.")]
    InvalidToken,
    #[error("Too many attempts. Please wait {wait_minutes} minutes before trying again.")]
    RateLimited {
        remaining: Duration,
        wait_minutes: u64,
    },
    #[error("{} field(s) need attention", .0.len())]
    InvalidFields(FieldErrors),
}

impl SubmissionRejection {
    fn rate_limited(remaining: Duration) -> Self {
        Self::RateLimited {
            remaining,
            wait_minutes: remaining.as_millis().div_ceil(60_000) as u64,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionRejection::InvalidFields(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Sanitized bundle handed to whatever transport the host application provides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionEnvelope<T> {
    pub form: FormKind,
    pub payload: T,
    pub form_token: FormToken,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Gate run once per submit attempt, shared by every form on the page.
pub struct SubmissionGuard<C> {
    clock: C,
    tokens: TokenIssuer<C>,
    limiter: RateLimiter<C>,
}

impl<C: Clock + Clone> SubmissionGuard<C> {
    pub fn new(config: &GuardConfig, clock: C) -> Self {
        Self {
            tokens: TokenIssuer::new(clock.clone(), config.token_ttl),
            limiter: RateLimiter::new(config.rate_limit, clock.clone()),
            clock,
        }
    }

    /// Token to embed when a form is opened.
    pub fn issue_token(&self) -> FormToken {
        self.tokens.issue()
    }

    pub fn is_token_valid(&self, token: &FormToken) -> bool {
        self.tokens.is_valid(token)
    }

    pub fn rate_limit_entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.limiter.entry(identifier)
    }

    pub fn remaining_time(&self, identifier: &str) -> Duration {
        self.limiter.remaining_time(identifier)
    }

    /// Check the token, validate every field, charge the sender's rate-limit window and, when
    /// all three pass, produce the sanitized envelope.
    ///
    /// Field validation runs before the limiter, so a form with errors never consumes an
    /// attempt.
    pub fn submit<F: FormSubmission>(
        &mut self,
        form: &F,
        token: &FormToken,
        user_agent: Option<&str>,
    ) -> Result<SubmissionEnvelope<F::Sanitized>, SubmissionRejection> {
        if !self.tokens.is_valid(token) {
            warn!(form = %F::KIND, "rejected submission with invalid or expired token");
            return Err(SubmissionRejection::InvalidToken);
        }

        let errors = form.validate();
        if !errors.is_empty() {
            debug!(form = %F::KIND, fields = errors.len(), "submission failed validation");
            return Err(SubmissionRejection::InvalidFields(errors));
        }

        let identifier = rate_limit_identifier(form.email());
        if !self.limiter.is_allowed(&identifier) {
            let remaining = self.limiter.remaining_time(&identifier);
            warn!(
                form = %F::KIND,
                identifier = %identifier,
                remaining_ms = remaining.as_millis() as u64,
                "submission rate limited"
            );
            return Err(SubmissionRejection::rate_limited(remaining));
        }

        Ok(SubmissionEnvelope {
            form: F::KIND,
            payload: form.sanitize(),
            form_token: token.clone(),
            submitted_at: self.clock.now(),
            user_agent: user_agent.map(|agent| truncate_chars(agent, MAX_USER_AGENT_CHARS).to_string()),
        })
    }
}

/// The sanitized email, or the shared anonymous bucket when there is none.
pub fn rate_limit_identifier(raw_email: &str) -> String {
    let email = sanitize_email(raw_email);
    if email.is_empty() {
        ANONYMOUS_IDENTIFIER.to_string()
    } else {
        email
    }
}
