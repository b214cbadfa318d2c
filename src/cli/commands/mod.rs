//! Command modules for CLI

pub mod add;
pub mod version;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
#[command(about = "helmrepo commands")]
pub enum Commands {
    /// Add a custom Helm repository (interactive unless --name is given)
    #[command(about = "Add a custom Helm chart repository")]
    Add(add::AddArgs),

    /// Show version information
    #[command(about = "Show version information")]
    Version(version::VersionArgs),
}
