//! deploywiz - Main entry point
//!
//! Loads a manifest, runs the wizard (in the terminal or headless) and writes
//! the collected settings as a Terraform variables file.

use anyhow::Context;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use deploywiz::app::{App, MAX_RECOVERIES, run_headless};
use deploywiz::cli::{Cli, Commands, RunArgs};
use deploywiz::cloud::{Inventory, InventoryClient};
use deploywiz::manifest::Manifest;
use deploywiz::wizard::{self, Queue, RunStatus};
use deploywiz::{logging, tfvars};

/// Main application entry point
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // Logging failure is not fatal; the wizard still works without it
    if let Err(e) = logging::init_logging(&cli.log_file) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    info!("deploywiz starting up");

    match cli.command() {
        Commands::Validate { manifest } => validate_manifest(&manifest),
        Commands::Run(args) => run(&args),
    }
}

fn validate_manifest(path: &Path) -> anyhow::Result<()> {
    info!("Validating manifest: {:?}", path);
    let manifest = match Manifest::load_from_file(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("Failed to load manifest: {:#}", e);
            eprintln!("✗ Failed to load manifest: {e:#}");
            std::process::exit(1);
        }
    };

    // An empty inventory is enough to lay out the pages
    let client = Arc::new(InventoryClient::new(Inventory::default()));
    match wizard::build(&manifest, client) {
        Ok(queue) => {
            info!("Manifest validation successful");
            println!("✓ Manifest is valid: {} pages", queue.len());
            for key in queue.keys() {
                println!("  - {key}");
            }
            Ok(())
        }
        Err(e) => {
            error!("Manifest validation failed: {}", e);
            eprintln!("✗ Manifest validation failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Project directory for a manifest path, stepping out of `.deploystack/`
fn project_dir(manifest_path: &Path) -> PathBuf {
    let parent = manifest_path.parent().unwrap_or(Path::new("."));
    let parent = if parent.file_name().is_some_and(|n| n == ".deploystack") {
        parent.parent().unwrap_or(Path::new("."))
    } else {
        parent
    };
    if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let manifest_path = match &args.manifest {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Manifest::discover(&cwd)?
        }
    };
    let dir = project_dir(&manifest_path);
    debug!("Project directory: {:?}", dir);

    let mut manifest = Manifest::load_from_file(&manifest_path)?;
    manifest.load_description(&dir)?;

    let inventory_path = args
        .inventory
        .as_deref()
        .context("--inventory <FILE> is required to answer cloud lookups")?;
    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("Failed to load inventory {}", inventory_path.display()))?;

    let mut queue = wizard::build(&manifest, Arc::new(InventoryClient::new(inventory)))?;

    if args.accept_defaults {
        info!("Running headless with defaults");
        run_headless(&mut queue, MAX_RECOVERIES)?;
    } else {
        queue = run_tui(queue)?;
    }

    match queue.status().clone() {
        RunStatus::Complete => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| manifest.terraform_dir(&dir).join("terraform.tfvars"));
            tfvars::write(&output, &queue.settings().export())?;
            info!("Wrote variables to {:?}", output);
            println!("✓ Wrote {}", output.display());
        }
        RunStatus::Failed(message) => {
            error!("Wizard failed: {}", message);
            eprintln!("✗ {message}");
            std::process::exit(1);
        }
        RunStatus::Cancelled => {
            warn!("Wizard cancelled by user");
            println!("Cancelled, nothing was written.");
        }
        status => debug!("Wizard ended in status {:?}", status),
    }
    Ok(())
}

/// Run the wizard in the terminal
fn run_tui(queue: Queue) -> anyhow::Result<Queue> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let mut app = App::new(queue);
    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| app.run(&mut terminal));

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    result.map(|()| app.into_queue())
}
