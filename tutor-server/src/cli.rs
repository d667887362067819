//! Command-line interface for the Socratica server binary.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(name = "socratica")]
#[command(about = "Socratic math tutoring API server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Run {
        /// Port to listen on (overrides SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Loads configuration from the environment, applying the CLI port
/// override when given.
pub fn load_config(port: Option<u16>) -> Result<ServerConfig> {
    let config = ServerConfig::load(port)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::try_parse_from(["socratica", "run"]).unwrap();
        match cli.command {
            Commands::Run { port } => assert!(port.is_none()),
        }
    }

    #[test]
    fn test_cli_parses_port_override() {
        let cli = Cli::try_parse_from(["socratica", "run", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Run { port } => assert_eq!(port, Some(8080)),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["socratica", "serve"]).is_err());
    }
}
