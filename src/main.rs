//! ApiScan CLI binary

use anyhow::Result;
use clap::error::ErrorKind;

use apiscan::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apiscan=info".into()),
        )
        .init();

    // Parse command line arguments; usage errors exit 1, help and version 0
    let matches = match CliApp::app().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            err.print()?;
            std::process::exit(1);
        }
    };

    // Run the CLI application
    CliApp::run(&matches).await
}
