use clap::{Args, ValueEnum};
use club_guard::config::AppConfig;
use club_guard::guard::{sanitize_email, sanitize_phone, sanitize_text};
use club_guard::{FormToken, SystemClock, TokenIssuer};

#[derive(Args, Debug)]
pub(crate) struct SanitizeArgs {
    /// Sanitizer to apply
    #[arg(value_enum)]
    pub(crate) kind: SanitizeKind,
    /// Raw value as a visitor would type it
    pub(crate) value: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SanitizeKind {
    Text,
    Email,
    Phone,
}

pub(crate) fn sanitize(kind: SanitizeKind, value: &str) -> String {
    match kind {
        SanitizeKind::Text => sanitize_text(value),
        SanitizeKind::Email => sanitize_email(value),
        SanitizeKind::Phone => sanitize_phone(value),
    }
}

pub(crate) fn run_sanitize(args: SanitizeArgs) {
    let sanitized = sanitize(args.kind, &args.value);
    if args.kind == SanitizeKind::Email && sanitized.is_empty() {
        eprintln!("not a valid email address");
    }
    println!("{sanitized}");
}

pub(crate) fn issue_token(config: &AppConfig) {
    let issuer = TokenIssuer::new(SystemClock::new(), config.guard.token_ttl);
    println!("{}", issuer.issue());
}

pub(crate) fn check_token(config: &AppConfig, token: String) {
    let issuer = TokenIssuer::new(SystemClock::new(), config.guard.token_ttl);
    if issuer.is_valid(&FormToken::new(token)) {
        println!("valid");
    } else {
        println!("invalid (expired or malformed)");
    }
}
