use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use std::io::Read;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use repofs::cli::{Cli, Command};
use repofs::{Config, FilesystemTools, ToolCall, ToolExecutor};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install subscriber: {e}"))?;

    debug!(?level, "Logging initialized");
    Ok(())
}

/// Tool input from the argument, or stdin when absent; empty means `{}`
fn read_input(arg: Option<String>) -> Result<serde_json::Value> {
    let text = match arg {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read tool input from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(&text).context("Tool input is not valid JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("rfs starting");

    match cli.command {
        Command::Tools => {
            for def in ToolExecutor::standard().definitions() {
                println!("{:<16} {}", def.name.cyan(), def.description);
            }
        }
        Command::Schema { tool } => {
            let def = ToolExecutor::standard()
                .definitions_for(std::slice::from_ref(&tool))
                .pop()
                .ok_or_else(|| eyre!("Tool not found: {tool}"))?;
            println!("{}", serde_json::to_string_pretty(&def.input_schema)?);
        }
        Command::Call { tool, input } => {
            let input = read_input(input)?;
            let tools = FilesystemTools::new(cli.roots, &config.tools).context("Failed to set up allowed roots")?;

            let result = tools.call(&ToolCall::new("cli", tool, input)).await;
            if result.is_error {
                eprintln!("{} {}", "✗".red(), result.content);
                std::process::exit(1);
            }
            println!("{}", result.content);
        }
    }

    Ok(())
}
