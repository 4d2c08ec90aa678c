use club_guard_cli::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("club-guard: {err}");
        std::process::exit(1);
    }
}
