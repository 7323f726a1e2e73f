//! vault-ami-test - end-to-end validation of the Vault machine image

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vault_ami_test::cli::Cli;
use vault_ami_test::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for `--json`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let as_json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                Ok(obj) if as_json => eprintln!("{obj}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
