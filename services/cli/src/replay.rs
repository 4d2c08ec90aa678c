use crate::cli::FormArg;
use crate::dispatch::log_envelope;
use crate::infra::render_rejection;
use clap::Args;
use club_guard::config::AppConfig;
use club_guard::error::AppError;
use club_guard::{
    ApplicationForm, Clock, ContactForm, FormSubmission, FormToken, ManualClock, SubmissionGuard,
    SubmissionRejection, SystemClock,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// Form the attempts belong to
    #[arg(value_enum)]
    pub(crate) form: FormArg,
    /// CSV with an `elapsed_ms` column followed by the form's fields
    #[arg(long)]
    pub(crate) input: PathBuf,
}

/// One row of a replay file: when the attempt happened relative to the form being opened.
trait TimedAttempt: DeserializeOwned {
    type Form: FormSubmission;

    fn into_parts(self) -> (u64, Self::Form);
}

#[derive(Debug, Deserialize)]
struct ContactAttempt {
    elapsed_ms: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
}

impl TimedAttempt for ContactAttempt {
    type Form = ContactForm;

    fn into_parts(self) -> (u64, ContactForm) {
        (
            self.elapsed_ms,
            ContactForm {
                name: self.name,
                email: self.email,
                subject: self.subject,
                message: self.message,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationAttempt {
    elapsed_ms: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    major: String,
    #[serde(default)]
    gpa: String,
    #[serde(default)]
    experience: String,
    #[serde(default)]
    motivation: String,
}

impl TimedAttempt for ApplicationAttempt {
    type Form = ApplicationForm;

    fn into_parts(self) -> (u64, ApplicationForm) {
        (
            self.elapsed_ms,
            ApplicationForm {
                name: self.name,
                email: self.email,
                phone: self.phone,
                year: self.year,
                major: self.major,
                gpa: self.gpa,
                experience: self.experience,
                motivation: self.motivation,
            },
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ReplaySummary {
    pub(crate) accepted: usize,
    pub(crate) invalid_fields: usize,
    pub(crate) invalid_token: usize,
    pub(crate) rate_limited: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &Result<(), SubmissionRejection>) {
        match outcome {
            Ok(()) => self.accepted += 1,
            Err(SubmissionRejection::InvalidFields(_)) => self.invalid_fields += 1,
            Err(SubmissionRejection::InvalidToken) => self.invalid_token += 1,
            Err(SubmissionRejection::RateLimited { .. }) => self.rate_limited += 1,
        }
    }
}

pub(crate) fn run_replay(args: ReplayArgs, config: &AppConfig) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.input)?;
    let summary = match args.form {
        FormArg::Contact => replay::<ContactAttempt, _>(file, config)?,
        FormArg::Application => replay::<ApplicationAttempt, _>(file, config)?,
    };

    println!(
        "\n{} accepted | {} invalid fields | {} invalid token | {} rate limited",
        summary.accepted, summary.invalid_fields, summary.invalid_token, summary.rate_limited
    );
    Ok(())
}

/// Replay every row through one guard whose clock starts when the form is opened.
fn replay<A, R>(reader: R, config: &AppConfig) -> Result<ReplaySummary, AppError>
where
    A: TimedAttempt,
    R: Read,
{
    let opened_at = SystemClock::new().now();
    let clock = ManualClock::new(opened_at);
    let mut guard = SubmissionGuard::new(&config.guard, clock.clone());
    let token = guard.issue_token();

    let mut summary = ReplaySummary::default();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (index, row) in csv_reader.deserialize::<A>().enumerate() {
        let (elapsed_ms, form) = row?.into_parts();
        let form = form.filtered();
        clock.set(opened_at);
        if clock
            .checked_advance(Duration::from_millis(elapsed_ms))
            .is_none()
        {
            return Err(AppError::OffsetOutOfRange {
                row: index + 1,
                elapsed_ms,
            });
        }

        let outcome = attempt(&mut guard, &form, &token);
        match &outcome {
            Ok(()) => println!("+{elapsed_ms}ms accepted"),
            Err(rejection) => {
                println!("+{elapsed_ms}ms rejected");
                for line in render_rejection(rejection) {
                    println!("    {line}");
                }
            }
        }
        summary.record(&outcome);
    }

    Ok(summary)
}

fn attempt<F: FormSubmission>(
    guard: &mut SubmissionGuard<ManualClock>,
    form: &F,
    token: &FormToken,
) -> Result<(), SubmissionRejection> {
    let envelope = guard.submit(form, token, None)?;
    if let Err(err) = log_envelope(&envelope) {
        tracing::warn!(error = %err, "failed to log replayed submission");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use club_guard::config::{AppEnvironment, DispatchConfig, TelemetryConfig};
    use club_guard::GuardConfig;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            guard: GuardConfig::default(),
            dispatch: DispatchConfig {
                delay: Duration::ZERO,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }

    #[test]
    fn replay_counts_each_outcome() {
        let csv = "\
elapsed_ms,name,email,subject,message
0,Al,bad,,
1000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
2000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
3000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
4000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
304000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
3600000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
";
        let summary =
            replay::<ContactAttempt, _>(csv.as_bytes(), &config()).expect("replay succeeds");

        assert_eq!(
            summary,
            ReplaySummary {
                accepted: 4,
                invalid_fields: 1,
                invalid_token: 1,
                rate_limited: 1,
            }
        );
    }

    #[test]
    fn application_rows_parse_with_optional_columns() {
        let csv = "\
elapsed_ms,name,email,year,major,motivation
0,Jordan Ellis,jellis@uni.edu,junior,Economics,I want to help cover the industrials sector for the fund this year.
";
        let summary =
            replay::<ApplicationAttempt, _>(csv.as_bytes(), &config()).expect("replay succeeds");
        assert_eq!(summary.accepted, 1);
    }

    #[test]
    fn rows_are_filtered_like_the_page_filters_keystrokes() {
        let csv = "\
elapsed_ms,name,email,year,major,gpa,motivation
0,Jordan Ellis,JEllis@Uni.EDU,junior,Economics,3.7/4,I want to help cover the industrials sector for the fund this year.
1000,Jordan Ellis,JEllis@Uni.EDU,junior,Economics,3.7,I want to help cover the industrials sector for the fund this year.
";
        let summary =
            replay::<ApplicationAttempt, _>(csv.as_bytes(), &config()).expect("replay succeeds");
        assert_eq!(
            summary,
            ReplaySummary {
                accepted: 1,
                invalid_fields: 1,
                invalid_token: 0,
                rate_limited: 0,
            }
        );
    }

    #[test]
    fn out_of_range_offset_names_the_row() {
        let csv = "\
elapsed_ms,name,email,subject,message
1000,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
18446744073709551615,Dana Kowalski,dana@uni.edu,Alumni mentoring,Happy to mentor analysts.
";
        match replay::<ContactAttempt, _>(csv.as_bytes(), &config()) {
            Err(AppError::OffsetOutOfRange { row, elapsed_ms }) => {
                assert_eq!(row, 2);
                assert_eq!(elapsed_ms, u64::MAX);
            }
            other => panic!("expected out-of-range offset, got {other:?}"),
        }
    }
}
