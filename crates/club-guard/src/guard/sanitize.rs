//! Lossy cleanup applied to raw form input before it leaves the page.

use regex::Regex;
use std::sync::OnceLock;

pub const MAX_TEXT_CHARS: usize = 1000;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MAX_INPUT_CHARS: usize = 2000;

struct Patterns {
    angle_brackets: Regex,
    script_protocol: Regex,
    event_handler: Regex,
    script: Regex,
    email: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        angle_brackets: Regex::new(r"[<>]").expect("static pattern"),
        script_protocol: Regex::new(r"(?i)javascript:").expect("static pattern"),
        event_handler: Regex::new(r"(?i)on[a-z0-9_]+=").expect("static pattern"),
        script: Regex::new(r"(?i)script").expect("static pattern"),
        email: Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("static pattern"),
    })
}

/// Which per-keystroke filter applies to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Email,
    Phone,
    Gpa,
    Text,
}

/// Strip markup-ish fragments from free text and cap it at [`MAX_TEXT_CHARS`].
///
/// Removal repeats until nothing changes, so fragments such as `scrscriptipt` cannot collapse
/// into a fresh match, and the result is stable under a second application. Each pass is
/// linear but nesting depth adds passes, so hosts cap raw text with [`filter_input`] first.
pub fn sanitize_text(input: &str) -> String {
    let mut current = input.trim().to_string();
    loop {
        let stripped = strip_markup(&current);
        let stripped = stripped.trim();
        if stripped == current {
            break;
        }
        current = stripped.to_string();
    }

    truncate_chars(&current, MAX_TEXT_CHARS)
        .trim_end()
        .to_string()
}

/// Normalize an address, returning an empty string when it does not look like
/// `local@domain.tld`. Callers must read an empty result as "invalid".
pub fn sanitize_email(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let candidate = truncate_chars(&lowered, MAX_EMAIL_CHARS);

    if patterns().email.is_match(candidate) {
        candidate.to_string()
    } else {
        String::new()
    }
}

/// Keep digits, whitespace and `+ - ( )`, capped at [`MAX_PHONE_CHARS`].
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '(' | ')'))
        .take(MAX_PHONE_CHARS)
        .collect()
}

/// Light filtering applied as the user types, before any validation runs.
pub fn filter_input(kind: InputKind, value: &str) -> String {
    match kind {
        InputKind::Email => value.to_lowercase().trim().to_string(),
        InputKind::Phone => sanitize_phone(value),
        InputKind::Gpa => value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect(),
        InputKind::Text => truncate_chars(value, MAX_INPUT_CHARS).to_string(),
    }
}

pub(crate) fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

fn strip_markup(input: &str) -> String {
    let patterns = patterns();
    let without_tags = patterns.angle_brackets.replace_all(input, "");
    let without_protocol = patterns.script_protocol.replace_all(&without_tags, "");
    let without_handlers = patterns.event_handler.replace_all(&without_protocol, "");
    patterns
        .script
        .replace_all(&without_handlers, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE: &[&str] = &[
        "<script>alert(1)</script>",
        "<SCRIPT src=x></ScRiPt>",
        "javascript:alert(document.cookie)",
        "JaVaScRiPt:void(0)",
        "<img src=x onerror=alert(1)>",
        "<a onClick=steal()>hi</a>",
        "scrscriptipt",
        "java<script:>script:",
        "ononclick==click",
        "  <<>>  padded  ",
        "plain text stays",
    ];

    fn contains_handler(value: &str) -> bool {
        patterns().event_handler.is_match(value)
    }

    #[test]
    fn hostile_fragments_are_removed() {
        for input in HOSTILE {
            let output = sanitize_text(input);
            let lowered = output.to_lowercase();
            assert!(!lowered.contains("<script>"), "{input:?} -> {output:?}");
            assert!(!lowered.contains("javascript:"), "{input:?} -> {output:?}");
            assert!(!lowered.contains("script"), "{input:?} -> {output:?}");
            assert!(!contains_handler(&output), "{input:?} -> {output:?}");
            assert!(output.chars().count() <= MAX_TEXT_CHARS);
        }
    }

    #[test]
    fn sanitize_text_is_idempotent() {
        let long_with_space = format!("{} tail", "a".repeat(MAX_TEXT_CHARS - 1));
        let mut inputs: Vec<String> = HOSTILE.iter().map(|s| s.to_string()).collect();
        inputs.push(long_with_space);
        inputs.push("x".repeat(5_000));
        inputs.push(" \t\n ".to_string());

        for input in inputs {
            let once = sanitize_text(&input);
            assert_eq!(sanitize_text(&once), once, "not stable for {input:?}");
        }
    }

    #[test]
    fn generated_markup_mixes_are_stripped_and_stable() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        const FRAGMENTS: &[&str] = &[
            "<", ">", "script", "SCR", "ipt", "on", "Click", "=", "onload=", "javascript:",
            "java", "Script:", " ", "\t", "\n", "a", "é",
        ];
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..2_000 {
            let len = rng.gen_range(0..24);
            let input: String = (0..len)
                .map(|_| FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())])
                .collect();
            let output = sanitize_text(&input);
            let lowered = output.to_lowercase();

            assert!(!output.contains(['<', '>']), "{input:?} -> {output:?}");
            assert!(!lowered.contains("javascript:"), "{input:?} -> {output:?}");
            assert!(!lowered.contains("script"), "{input:?} -> {output:?}");
            assert!(!contains_handler(&output), "{input:?} -> {output:?}");
            assert_eq!(sanitize_text(&output), output, "not stable for {input:?}");
        }
    }

    #[test]
    fn sanitize_text_keeps_ordinary_prose() {
        assert_eq!(
            sanitize_text("  I'd like to learn about equity research.  "),
            "I'd like to learn about equity research."
        );
        assert_eq!(sanitize_text("<b>bold</b>"), "bbold/b");
    }

    #[test]
    fn sanitize_text_truncates_long_input() {
        let output = sanitize_text(&"é".repeat(1_500));
        assert_eq!(output.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn sanitize_email_normalizes_or_rejects() {
        assert_eq!(sanitize_email("  USER@Example.COM "), "user@example.com");
        assert_eq!(sanitize_email("not-an-email"), "");
        assert_eq!(sanitize_email("a@b.c"), "");
        assert_eq!(sanitize_email("first.last+club@uni.edu"), "first.last+club@uni.edu");
    }

    #[test]
    fn sanitize_email_rejects_overlong_addresses() {
        let address = format!("{}@example.com", "a".repeat(250));
        assert_eq!(sanitize_email(&address), "");
    }

    #[test]
    fn sanitize_phone_keeps_dialing_characters() {
        assert_eq!(sanitize_phone("+1 (555) 010-9999 ext"), "+1 (555) 010-9999 ");
        assert_eq!(sanitize_phone("555.010.9999"), "5550109999");
        assert_eq!(sanitize_phone(&"9".repeat(40)).len(), MAX_PHONE_CHARS);
    }

    #[test]
    fn filter_input_applies_per_kind_rules() {
        assert_eq!(filter_input(InputKind::Email, " Me@Club.ORG "), "me@club.org");
        assert_eq!(filter_input(InputKind::Phone, "(555) abc"), "(555) ");
        assert_eq!(filter_input(InputKind::Gpa, "3.7/4"), "3.74");
        assert_eq!(
            filter_input(InputKind::Text, &"m".repeat(2_500)).len(),
            MAX_INPUT_CHARS
        );
    }
}
