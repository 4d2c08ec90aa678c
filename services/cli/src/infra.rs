use club_guard::error::AppError;
use club_guard::SubmissionRejection;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Form-level errors print as a single banner line; field errors print one line per field.
pub(crate) fn render_rejection(rejection: &SubmissionRejection) -> Vec<String> {
    match rejection.field_errors() {
        Some(errors) => errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect(),
        None => vec![rejection.to_string()],
    }
}
