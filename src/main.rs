mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use handlebox::config::HandleConfig;
use handlebox::handle::HandleClient;
use handlebox::observability;
use serde_json::json;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    observability::init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => HandleConfig::load_with_file(path)?,
        None => HandleConfig::load()?,
    };
    cli.command.args().apply(&mut config);

    let success = match cli.command {
        Commands::Set(_) => {
            let result = HandleClient::new().set_handle(&config).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            result.success
        }
        Commands::Delete(_) => {
            let result = HandleClient::new().delete_handle(&config).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            result.success
        }
        Commands::Validate(_) => {
            let report = config.validate();
            let output = json!({
                "valid": report.is_valid(),
                "failures": report.issues(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            report.is_valid()
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
