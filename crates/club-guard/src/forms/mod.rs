//! The two field sets the guard protects: the contact form and the membership application.

pub mod application;
pub mod contact;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::guard::sanitize::{filter_input, InputKind};

pub use application::{ApplicationForm, SanitizedApplication};
pub use contact::{ContactForm, SanitizedContact};

/// Identifier charged against the rate limiter when a form carries no usable email.
pub const ANONYMOUS_IDENTIFIER: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Application,
}

impl FormKind {
    pub fn label(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Application => "application",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A form whose fields can be validated and then reduced to a sanitized payload.
pub trait FormSubmission {
    type Sanitized: Serialize;

    const KIND: FormKind;

    /// Per-keystroke filter a field receives on the page, if any.
    fn input_kind(field: &str) -> Option<InputKind>;

    /// Apply every field's per-keystroke filter, the state the form holds when it is sent.
    fn filtered(self) -> Self
    where
        Self: Sized;

    /// Run every field's rules, collecting one message per failing field.
    fn validate(&self) -> FieldErrors;

    fn sanitize(&self) -> Self::Sanitized;

    /// Raw email as typed, used to derive the rate-limit identifier.
    fn email(&self) -> &str;
}

/// Per-field messages keyed by field name. The first failing rule for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: &'static str, error: Option<String>) {
        if let Some(message) = error {
            self.0.entry(field).or_insert(message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

pub(crate) fn filter_field<F: FormSubmission>(field: &str, value: String) -> String {
    match F::input_kind(field) {
        Some(kind) => filter_input(kind, &value),
        None => value,
    }
}

/// Re-render a validated GPA the way the site submits it (`"3.50"` becomes `"3.5"`).
pub(crate) fn normalize_gpa(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    crate::guard::validate::parse_leading_decimal(raw)
        .map(|gpa| gpa.to_string())
        .unwrap_or_default()
}
