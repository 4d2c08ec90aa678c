//! Field validators. Each returns the user-facing message on failure and `None` otherwise.

use super::sanitize::sanitize_email;

pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 4.0;

pub fn validate_required(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{label} is required"))
    } else {
        None
    }
}

pub fn validate_email(value: &str) -> Option<String> {
    if sanitize_email(value).is_empty() {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

/// GPA is optional; anything supplied must read as a number within [0.0, 4.0].
pub fn validate_gpa(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    match parse_leading_decimal(value) {
        Some(gpa) if (MIN_GPA..=MAX_GPA).contains(&gpa) => None,
        _ => Some("GPA must be between 0.0 and 4.0".to_string()),
    }
}

pub fn validate_text_length(value: &str, label: &str, min: usize, max: usize) -> Option<String> {
    let length = value.chars().count();
    if length < min {
        return Some(format!("{label} must be at least {min} characters"));
    }
    if length > max {
        return Some(format!("{label} must be no more than {max} characters"));
    }
    None
}

/// Read the longest decimal prefix of `value`, the way a browser's `parseFloat` does:
/// leading whitespace is skipped and trailing garbage ignored (`"3.5 gpa"` reads as 3.5).
pub(crate) fn parse_leading_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut cursor = fraction_start;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        digits += cursor - fraction_start;
        if digits > 0 {
            end = cursor;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exponent_start = cursor;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}
