use crate::cli::FormArg;
use crate::dispatch::LoggingTransport;
use crate::infra::{read_json, render_rejection};
use clap::Args;
use club_guard::config::AppConfig;
use club_guard::error::AppError;
use club_guard::{
    ApplicationForm, Clock, ContactForm, FormSubmission, FormToken, SubmissionGuard, SystemClock,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Form the input belongs to
    #[arg(value_enum)]
    pub(crate) form: FormArg,
    /// JSON file holding the raw field values
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Existing form token; a fresh one is issued when omitted
    #[arg(long)]
    pub(crate) token: Option<String>,
    /// User agent recorded alongside the payload
    #[arg(long)]
    pub(crate) user_agent: Option<String>,
}

pub(crate) async fn run_submit(args: SubmitArgs, config: &AppConfig) -> Result<(), AppError> {
    let SubmitArgs {
        form,
        input,
        token,
        user_agent,
    } = args;

    let mut guard = SubmissionGuard::new(&config.guard, SystemClock::new());
    let token = token
        .map(FormToken::new)
        .unwrap_or_else(|| guard.issue_token());
    let transport = LoggingTransport::new(config.dispatch);
    let user_agent = user_agent.as_deref();

    match form {
        FormArg::Contact => {
            let form = read_json::<ContactForm>(&input)?.filtered();
            submit_and_dispatch(&mut guard, &transport, &form, &token, user_agent).await
        }
        FormArg::Application => {
            let form = read_json::<ApplicationForm>(&input)?.filtered();
            submit_and_dispatch(&mut guard, &transport, &form, &token, user_agent).await
        }
    }
}

async fn submit_and_dispatch<F, C>(
    guard: &mut SubmissionGuard<C>,
    transport: &LoggingTransport,
    form: &F,
    token: &FormToken,
    user_agent: Option<&str>,
) -> Result<(), AppError>
where
    F: FormSubmission,
    C: Clock + Clone,
{
    let envelope = match guard.submit(form, token, user_agent) {
        Ok(envelope) => envelope,
        Err(rejection) => {
            for line in render_rejection(&rejection) {
                eprintln!("  {line}");
            }
            return Err(rejection.into());
        }
    };

    println!("Sending {} form...", F::KIND);
    transport.deliver(&envelope).await?;
    println!("{} form submitted at {}", F::KIND, envelope.submitted_at.to_rfc3339());
    Ok(())
}
