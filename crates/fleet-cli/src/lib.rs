//! Fleet CLI - Command-line viewer for the deployment management API
//!
//! This CLI gives operators a terminal view of:
//! - Deployments, filtered by location, image, state, address or id prefix
//! - The placements of a deployment and their lifecycle events
//!
//! `--json` turns every command into a non-interactive, machine-readable run.

use clap::{Parser, Subcommand};
use dialoguer::console::Term;
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod account;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod prompt;
pub mod render;

use commands::list::{self, OutputMode};
use config::CliConfig;
pub use error::{CliError, CliResult};

/// Fleet CLI application
#[derive(Parser)]
#[command(name = "fleet")]
#[command(about = "Fleet - browse deployments and their placements", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FLEET_CONFIG", global = true)]
    config: Option<String>,

    /// Management API endpoint
    #[arg(short, long, env = "FLEET_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// API token
    #[arg(long, env = "FLEET_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Non-interactive, machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List deployments and browse their placements
    #[command(alias = "ls")]
    List(list::ListArgs),
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
    let token = config.resolve_token(cli.token.as_deref());
    tracing::debug!(%endpoint, has_token = token.is_some(), "resolved connection settings");

    // Create client
    let client = client::FleetClient::new(&endpoint, token, config.timeout())?;

    let mode = if cli.json {
        OutputMode::Json
    } else if Term::stdout().is_term() && Term::stderr().is_term() {
        OutputMode::Interactive
    } else {
        OutputMode::Table
    };

    // Execute command
    match cli.command {
        Commands::List(args) => list::execute(args, &client, mode).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fleet_types::DeploymentState;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "fleet", "--json", "list", "ab12", "--location", "ams", "--image", "web:1",
            "--state", "running", "--ipv4", "10.1.2.3",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::List(args) = cli.command;
        assert_eq!(args.deployment_id_prefix.as_deref(), Some("ab12"));
        assert_eq!(args.location.as_deref(), Some("ams"));
        assert_eq!(args.image.as_deref(), Some("web:1"));
        assert_eq!(args.state, Some(DeploymentState::Running));
        assert_eq!(args.ipv4.unwrap().to_string(), "10.1.2.3");
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["fleet", "list", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_invalid_filters_are_rejected() {
        assert!(Cli::try_parse_from(["fleet", "list", "--state", "sleeping"]).is_err());
        assert!(Cli::try_parse_from(["fleet", "list", "--ipv4", "300.1.1.1"]).is_err());
        assert!(Cli::try_parse_from(["fleet", "list", "--location", " "]).is_err());
        assert!(Cli::try_parse_from(["fleet", "list", "ab/cd"]).is_err());
    }
}
