//! Building blocks of the submission guard: input cleanup, field validators, the per-sender
//! rate limiter, and opaque form tokens. Nothing here performs I/O or blocks.

pub mod clock;
pub mod rate_limit;
pub mod sanitize;
pub mod token;
pub mod validate;

pub use sanitize::{filter_input, sanitize_email, sanitize_phone, sanitize_text};
pub use validate::{validate_email, validate_gpa, validate_required, validate_text_length};
