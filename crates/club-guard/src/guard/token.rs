//! Opaque form tokens carrying their issuance time.
//!
//! A token is the base64 encoding of a 13-digit millisecond timestamp followed by random
//! digits, with every non-alphanumeric character removed. Tokens are checked, never consumed.

use std::fmt;
use std::time::Duration;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::Clock;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_millis(3_600_000);

const TIMESTAMP_DIGITS: usize = 13;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormToken(String);

impl FormToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues tokens and checks their age against a TTL.
#[derive(Debug, Clone)]
pub struct TokenIssuer<C> {
    clock: C,
    ttl: Duration,
}

impl<C: Clock> TokenIssuer<C> {
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self { clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self) -> FormToken {
        let nonce: u64 = rand::thread_rng().gen();
        encode_token(self.clock.now_millis(), nonce)
    }

    /// True while the embedded timestamp is younger than the TTL. Anything that fails to
    /// decode is invalid.
    pub fn is_valid(&self, token: &FormToken) -> bool {
        let Some(issued_at) = decode_timestamp(token.as_str()) else {
            debug!("form token failed to decode");
            return false;
        };

        let ttl = self.ttl.as_millis().min(i64::MAX as u128) as i64;
        self.clock.now_millis().saturating_sub(issued_at) < ttl
    }
}

pub(crate) fn encode_token(issued_at_ms: i64, nonce: u64) -> FormToken {
    let payload = format!("{:0width$}{nonce}", issued_at_ms.max(0), width = TIMESTAMP_DIGITS);
    FormToken(strip_non_alphanumeric(&STANDARD_NO_PAD.encode(payload)))
}

fn decode_timestamp(token: &str) -> Option<i64> {
    let cleaned = strip_non_alphanumeric(token);
    if cleaned.is_empty() {
        return None;
    }

    let decoded = LENIENT.decode(cleaned).ok()?;
    let prefix = decoded.get(..TIMESTAMP_DIGITS)?;
    if !prefix.iter().all(u8::is_ascii_digit) {
        return None;
    }

    std::str::from_utf8(prefix).ok()?.parse().ok()
}

fn strip_non_alphanumeric(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}
