use serde::{Deserialize, Serialize};

use super::{filter_field, FieldErrors, FormKind, FormSubmission};
use crate::guard::sanitize::{sanitize_email, sanitize_text, InputKind};
use crate::guard::validate::{validate_email, validate_required, validate_text_length};

/// Raw contact form input as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormSubmission for ContactForm {
    type Sanitized = SanitizedContact;

    const KIND: FormKind = FormKind::Contact;

    fn input_kind(field: &str) -> Option<InputKind> {
        match field {
            "email" => Some(InputKind::Email),
            "name" | "subject" | "message" => Some(InputKind::Text),
            _ => None,
        }
    }

    fn filtered(self) -> Self {
        Self {
            name: filter_field::<Self>("name", self.name),
            email: filter_field::<Self>("email", self.email),
            subject: filter_field::<Self>("subject", self.subject),
            message: filter_field::<Self>("message", self.message),
        }
    }

    fn validate(&self) -> FieldErrors {
        let name = sanitize_text(&self.name);
        let subject = sanitize_text(&self.subject);
        let message = sanitize_text(&self.message);

        let mut errors = FieldErrors::new();
        errors.record(
            "name",
            validate_required(&name, "Name").or_else(|| validate_text_length(&name, "Name", 2, 100)),
        );
        errors.record("email", validate_email(&self.email));
        errors.record(
            "subject",
            validate_required(&subject, "Subject")
                .or_else(|| validate_text_length(&subject, "Subject", 5, 200)),
        );
        errors.record(
            "message",
            validate_required(&message, "Message")
                .or_else(|| validate_text_length(&message, "Message", 10, 2000)),
        );
        errors
    }

    fn sanitize(&self) -> SanitizedContact {
        SanitizedContact {
            name: sanitize_text(&self.name),
            email: sanitize_email(&self.email),
            subject: sanitize_text(&self.subject),
            message: sanitize_text(&self.message),
        }
    }

    fn email(&self) -> &str {
        &self.email
    }
}
