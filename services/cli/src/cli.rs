use crate::replay::{run_replay, ReplayArgs};
use crate::submit::{run_submit, SubmitArgs};
use crate::tools::{check_token, issue_token, run_sanitize, SanitizeArgs};
use clap::{Parser, Subcommand, ValueEnum};
use club_guard::config::AppConfig;
use club_guard::error::AppError;
use club_guard::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "club-guard",
    about = "Run club website form submissions through the submission guard",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate, rate-limit and dispatch a single form submission
    Submit(SubmitArgs),
    /// Replay timed submission attempts from a CSV file on simulated time
    Replay(ReplayArgs),
    /// Print the sanitized form of a raw value
    Sanitize(SanitizeArgs),
    /// Issue or check form tokens
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Print a freshly issued form token
    Issue,
    /// Report whether a token is still within its validity window
    Check {
        /// Token previously printed by `token issue`
        token: String,
    },
}

/// Which of the site's forms an input belongs to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormArg {
    Contact,
    Application,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, ?config.guard, "configuration loaded");

    match cli.command {
        Command::Submit(args) => run_submit(args, &config).await,
        Command::Replay(args) => run_replay(args, &config),
        Command::Sanitize(args) => {
            run_sanitize(args);
            Ok(())
        }
        Command::Token {
            command: TokenCommand::Issue,
        } => {
            issue_token(&config);
            Ok(())
        }
        Command::Token {
            command: TokenCommand::Check { token },
        } => {
            check_token(&config, token);
            Ok(())
        }
    }
}
