//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Courier - multi-target remote deployment orchestrator
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Package the workspace and roll it out to every target of the resolved environment
    Deploy {
        /// Deployment configuration file
        #[arg(short, long, default_value = "courier.yml")]
        config: PathBuf,

        /// Build workspace to package
        #[arg(short, long)]
        workspace: PathBuf,

        /// Build identifier
        #[arg(long)]
        build_id: String,

        /// Commit identifier
        #[arg(long)]
        commit: String,

        /// Source branch the build was made from
        #[arg(long)]
        branch: String,

        /// Private key file for the deploy session
        #[arg(short, long)]
        key_file: PathBuf,

        /// Override the configured operator username
        #[arg(long)]
        operator: Option<String>,

        /// Where to write the build record
        #[arg(long, default_value = "courier-build.json")]
        ledger: PathBuf,

        /// Build directories to keep per host after cleanup
        #[arg(long, default_value_t = 3)]
        keep: usize,
    },

    /// Resolve and print the targets for a branch without deploying
    Targets {
        /// Deployment configuration file
        #[arg(short, long, default_value = "courier.yml")]
        config: PathBuf,

        /// Source branch to resolve
        #[arg(long)]
        branch: String,
    },
}
