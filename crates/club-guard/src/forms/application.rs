use serde::{Deserialize, Serialize};

use super::{filter_field, normalize_gpa, FieldErrors, FormKind, FormSubmission};
use crate::guard::sanitize::{sanitize_email, sanitize_phone, sanitize_text, InputKind};
use crate::guard::validate::{
    validate_email, validate_gpa, validate_required, validate_text_length,
};

/// Raw membership application input. `phone`, `gpa` and `experience` are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year: String,
    pub major: String,
    pub gpa: String,
    pub experience: String,
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year: String,
    pub major: String,
    pub gpa: String,
    pub experience: String,
    pub motivation: String,
}

impl FormSubmission for ApplicationForm {
    type Sanitized = SanitizedApplication;

    const KIND: FormKind = FormKind::Application;

    fn input_kind(field: &str) -> Option<InputKind> {
        match field {
            "email" => Some(InputKind::Email),
            "phone" => Some(InputKind::Phone),
            "gpa" => Some(InputKind::Gpa),
            "name" | "year" | "major" | "experience" | "motivation" => Some(InputKind::Text),
            _ => None,
        }
    }

    fn filtered(self) -> Self {
        Self {
            name: filter_field::<Self>("name", self.name),
            email: filter_field::<Self>("email", self.email),
            phone: filter_field::<Self>("phone", self.phone),
            year: filter_field::<Self>("year", self.year),
            major: filter_field::<Self>("major", self.major),
            gpa: filter_field::<Self>("gpa", self.gpa),
            experience: filter_field::<Self>("experience", self.experience),
            motivation: filter_field::<Self>("motivation", self.motivation),
        }
    }

    fn validate(&self) -> FieldErrors {
        let name = sanitize_text(&self.name);
        let year = sanitize_text(&self.year);
        let major = sanitize_text(&self.major);
        let experience = sanitize_text(&self.experience);
        let motivation = sanitize_text(&self.motivation);

        let mut errors = FieldErrors::new();
        errors.record(
            "name",
            validate_required(&name, "Name").or_else(|| validate_text_length(&name, "Name", 2, 100)),
        );
        errors.record("email", validate_email(&self.email));
        errors.record("year", validate_required(&year, "Academic Year"));
        errors.record(
            "major",
            validate_required(&major, "Major")
                .or_else(|| validate_text_length(&major, "Major", 2, 100)),
        );
        errors.record("gpa", validate_gpa(self.gpa.trim()));
        errors.record(
            "experience",
            validate_text_length(&experience, "Experience", 0, 2000),
        );
        errors.record(
            "motivation",
            validate_required(&motivation, "Motivation")
                .or_else(|| validate_text_length(&motivation, "Motivation", 50, 2000)),
        );
        errors
    }

    fn sanitize(&self) -> SanitizedApplication {
        SanitizedApplication {
            name: sanitize_text(&self.name),
            email: sanitize_email(&self.email),
            phone: sanitize_phone(&self.phone),
            year: sanitize_text(&self.year),
            major: sanitize_text(&self.major),
            gpa: normalize_gpa(self.gpa.trim()),
            experience: sanitize_text(&self.experience),
            motivation: sanitize_text(&self.motivation),
        }
    }

    fn email(&self) -> &str {
        &self.email
    }
}
