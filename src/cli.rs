use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::DEFAULT_LOG_FILE;

/// deploywiz - collect deployment settings and write a variables file
#[derive(Parser, Debug)]
#[command(name = "deploywiz")]
#[command(about = "Interactive configuration wizard for cloud deployments")]
#[command(version)]
pub struct Cli {
    /// Log file (the terminal is reserved for the wizard)
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the wizard (default)
    Run(RunArgs),
    /// Check a manifest and the pages it produces without running the wizard
    Validate {
        /// Manifest file to check
        manifest: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Manifest to use; otherwise discovered in the current directory
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Cloud inventory snapshot (JSON) that answers provider queries
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,

    /// Variables file to write; defaults to terraform.tfvars in the
    /// manifest's terraform directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Accept every default without a terminal
    #[arg(long)]
    pub accept_defaults: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run; `run` with no flags when none was given
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}
