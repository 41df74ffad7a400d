//! Apigen CLI: REST/JSON:API scaffolding.
//!
//! ```bash
//! apigen init
//! apigen make:api Profile/Payer
//! ```
//!
//! See `apigen --help` for all available commands and options.

mod commands;
mod templates;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use apigen_core::config::{ApigenConfig, CONFIG_FILE_NAME};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apigen", about = "REST/JSON:API scaffolding tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a controller, a transformer and a route for a model
    #[command(name = "make:api")]
    MakeApi {
        /// Model name, e.g. `Payer` or `Profile/Payer`
        name: String,

        /// Application root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Configuration file (default: <root>/apigen.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write apigen.toml, editable stubs and a routes file
    Init {
        /// Application root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<ApigenConfig> {
    match explicit {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => ApigenConfig::load_from(path),
        None => ApigenConfig::load_from(root.join(CONFIG_FILE_NAME)),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::MakeApi { name, root, config } => {
            let config = load_config(&root, config.as_deref())?;
            apigen_core::logging::init(&config.logging);
            commands::make_api::run(&name, &root, &config).map(|_| ())
        }
        Commands::Init { root } => {
            let config = load_config(&root, None)?;
            apigen_core::logging::init(&config.logging);
            commands::init::run(&root, &config).map(|_| ())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
