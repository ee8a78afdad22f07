use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use mediclerk_cli::cli::Cli;
use mediclerk_cli::commands;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    commands::run(cli).await
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
