//! Main CLI application structure

use clap::Parser;
use helmrepo::ServiceConfig;
use std::path::PathBuf;

use crate::cli::commands::{add, version, Commands};
use crate::cli::error::CliResult;

/// helmrepo CLI - Register custom Helm chart repositories
#[derive(Debug, Parser)]
#[command(name = "helmrepo")]
#[command(version = helmrepo::VERSION)]
#[command(about = "helmrepo - Register custom Helm chart repositories")]
#[command(long_about = "helmrepo adds custom Helm chart repositories to a local registry.\n\n\
                         The repositories file is resolved using this priority:\n\
                         1. --repositories-path\n\
                         2. HELMREPO_REPOSITORIES environment variable\n\
                         3. <config dir>/helmrepo/repositories.toml\n\n\
                         Examples:\n\
                           helmrepo add                                   # Interactive dialog\n\
                           helmrepo add --name stable --url https://charts.example.com/stable\n\
                           helmrepo add --name internal --url https://charts.corp --ca-file ~/certs/ca.pem")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to repositories.toml file (overrides default location)
    #[arg(long, global = true, help = "Path to repositories.toml file")]
    pub repositories_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> CliResult<()> {
        // Initialize logging
        if self.verbose {
            helmrepo::init_logging_with_default("helmrepo=debug");
        } else {
            helmrepo::init_logging();
        }

        match self.command {
            Commands::Version(args) => version::execute_version(args).await,
            Commands::Add(args) => {
                let config = ServiceConfig::resolve(self.repositories_path);
                if self.verbose {
                    println!(
                        "Using repositories file: {}",
                        config.repositories_path.display()
                    );
                }
                add::execute_add(args, config).await
            }
        }
    }
}
