use std::env;
use std::fmt;
use std::time::Duration;

use crate::guard::rate_limit::{RateLimitPolicy, RateLimitPolicyError, DEFAULT_MAX_ATTEMPTS};
use crate::guard::token::DEFAULT_TOKEN_TTL;

const DEFAULT_WINDOW_MS: u64 = 300_000;
const DEFAULT_DISPATCH_DELAY_MS: u64 = 2_000;

/// Distinguishes runtime behavior for different stages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "test" | "ci" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration for the hosting application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub guard: GuardConfig,
    pub dispatch: DispatchConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            AppEnvironment::parse(&env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))?;

        let max_attempts = env_number("GUARD_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS as u64)?;
        let max_attempts =
            u32::try_from(max_attempts).map_err(|_| ConfigError::InvalidNumber {
                var: "GUARD_MAX_ATTEMPTS",
            })?;
        let window = Duration::from_millis(env_number("GUARD_WINDOW_MS", DEFAULT_WINDOW_MS)?);
        let rate_limit = RateLimitPolicy::new(max_attempts, window)
            .map_err(|source| ConfigError::RateLimit { source })?;

        let token_ttl = Duration::from_millis(env_number(
            "GUARD_TOKEN_TTL_MS",
            DEFAULT_TOKEN_TTL.as_millis() as u64,
        )?);
        if token_ttl.is_zero() {
            return Err(ConfigError::ZeroValue {
                var: "GUARD_TOKEN_TTL_MS",
            });
        }

        let delay = Duration::from_millis(env_number(
            "GUARD_DISPATCH_DELAY_MS",
            DEFAULT_DISPATCH_DELAY_MS,
        )?);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            guard: GuardConfig {
                rate_limit,
                token_ttl,
            },
            dispatch: DispatchConfig { delay },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Limits enforced by the submission guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    pub rate_limit: RateLimitPolicy,
    pub token_ttl: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitPolicy::default(),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

/// Stand-in transport settings. The delay imitates a network round trip.
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    pub delay: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn env_number(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment { value: String },
    InvalidNumber { var: &'static str },
    ZeroValue { var: &'static str },
    RateLimit { source: RateLimitPolicyError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment { value } => write!(
                f,
                "APP_ENV must be development, test or production (found '{}')",
                value
            ),
            ConfigError::InvalidNumber { var } => {
                write!(f, "{} must be a non-negative integer", var)
            }
            ConfigError::ZeroValue { var } => write!(f, "{} must be greater than zero", var),
            ConfigError::RateLimit { source } => write!(f, "invalid rate limit: {}", source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::RateLimit { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("GUARD_MAX_ATTEMPTS");
        env::remove_var("GUARD_WINDOW_MS");
        env::remove_var("GUARD_TOKEN_TTL_MS");
        env::remove_var("GUARD_DISPATCH_DELAY_MS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.guard, GuardConfig::default());
        assert_eq!(config.guard.rate_limit.max_attempts(), 3);
        assert_eq!(config.guard.rate_limit.window(), Duration::from_millis(300_000));
        assert_eq!(config.guard.token_ttl, Duration::from_millis(3_600_000));
        assert_eq!(config.dispatch.delay, Duration::from_millis(2_000));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn overrides_guard_limits_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("GUARD_MAX_ATTEMPTS", "5");
        env::set_var("GUARD_WINDOW_MS", "60000");
        env::set_var("GUARD_DISPATCH_DELAY_MS", "0");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.guard.rate_limit.max_attempts(), 5);
        assert_eq!(config.guard.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.dispatch.delay, Duration::ZERO);
    }

    #[test]
    fn rejects_unknown_environment_and_bad_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "staging");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidEnvironment { .. })
        ));

        reset_env();
        env::set_var("GUARD_WINDOW_MS", "five minutes");
        let err = AppConfig::load().expect_err("unparseable window");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: "GUARD_WINDOW_MS"
            }
        ));
        assert_eq!(err.to_string(), "GUARD_WINDOW_MS must be a non-negative integer");

        reset_env();
        env::set_var("GUARD_TOKEN_TTL_MS", "0");
        assert_eq!(
            AppConfig::load()
                .expect_err("zero ttl")
                .to_string(),
            "GUARD_TOKEN_TTL_MS must be greater than zero"
        );

        reset_env();
        env::set_var("GUARD_MAX_ATTEMPTS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::RateLimit {
                source: RateLimitPolicyError::ZeroAttempts
            })
        ));
        reset_env();
    }
}
