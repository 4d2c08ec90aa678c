mod cli;
mod dispatch;
mod infra;
mod replay;
mod submit;
mod tools;

use club_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
