//! Porter CLI - token-authenticated API requests

mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use porter_http::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "porter")]
#[command(about = "Send API requests authenticated with the stored access token")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (defaults to ./porter.toml when present)
    #[arg(short = 'c', long, global = true, env = "PORTER_CONFIG")]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let config = ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(base_url = %config.base_url, "Loaded configuration");

    let outcome = if cli.timeout == 0 {
        cli.command.execute(&config).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(&config)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "Command timed out after {} seconds",
                cli.timeout
            )),
        }
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_request_command() {
        let cli = Cli::try_parse_from([
            "porter",
            "--timeout",
            "0",
            "request",
            "POST",
            "/orders",
            "--data",
            r#"{"item":"widget"}"#,
        ])
        .unwrap();

        assert_eq!(cli.timeout, 0);
        match cli.command {
            Commands::Request { method, path, data } => {
                assert_eq!(method, reqwest::Method::POST);
                assert_eq!(path, "/orders");
                assert_eq!(data.as_deref(), Some(r#"{"item":"widget"}"#));
            }
            _ => panic!("expected request command"),
        }
    }
}
