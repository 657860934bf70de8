use dha::commands::Cli;
use dha::libs::messages::macros::is_debug_mode;
use dha::msg_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenv::dotenv();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_target(false)
            .init();
    }

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            msg_error!(e);
            ExitCode::FAILURE
        }
    }
}
