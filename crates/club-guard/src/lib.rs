//! Submission guard for the club website's contact and application forms.
//!
//! Every submission passes through [`SubmissionGuard`]: the form token is checked, each field
//! is validated, the sender's identifier is charged against a fixed-window rate limiter, and
//! only then is a sanitized payload produced for whatever transport the host provides.

pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod submission;
pub mod telemetry;

pub use config::{AppConfig, GuardConfig};
pub use forms::{
    ApplicationForm, ContactForm, FieldErrors, FormKind, FormSubmission, SanitizedApplication,
    SanitizedContact,
};
pub use guard::clock::{Clock, ManualClock, SystemClock};
pub use guard::rate_limit::{RateLimitEntry, RateLimitPolicy, RateLimiter};
pub use guard::sanitize::InputKind;
pub use guard::token::{FormToken, TokenIssuer};
pub use submission::{SubmissionEnvelope, SubmissionGuard, SubmissionRejection};
