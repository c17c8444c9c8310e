//! rpitx-control - configure and drive the rpitx expansion board

mod backend;
mod commands;
mod session;
mod settings;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rpitx_device::{BoardModel, ConfigStore, Device};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::CatalogKind;
use settings::Settings;

const DEFAULT_LOG_FILTER: &str = "rpitx_control=info,rf_switch=info,rpitx_device=info";

/// Configure and control the rpitx expansion board
#[derive(Parser, Debug)]
#[command(name = "rpitx-control", version, about)]
struct Cli {
    /// Drive simulated GPIO lines instead of the Raspberry Pi header
    #[arg(long, global = true)]
    simulate_gpio: bool,

    /// Directory holding settings.json and saved configurations
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Also append log output to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported board models
    Boards,

    /// List saved board configurations
    Configs,

    /// Create and save a board configuration
    New {
        /// Board model name, e.g. rpitx-expansion-board-SP3T-LNA
        board: BoardModel,

        /// Filter for the next slot as MODEL@CASE, or "none" (repeatable)
        #[arg(long = "filter", value_name = "MODEL[@CASE]")]
        filters: Vec<String>,

        /// Amplifier for the LNA stage as MODEL@CASE
        #[arg(long, value_name = "MODEL[@CASE]")]
        amplifier: Option<String>,

        /// Catalog directory with filters/ and amplifiers/ JSON files
        #[arg(long, value_name = "DIR")]
        catalog: Option<PathBuf>,
    },

    /// List catalog case styles and the models in each
    Catalog {
        /// Catalog to list
        #[arg(value_enum)]
        kind: CatalogKind,

        /// Only list this case style
        #[arg(long, value_name = "CASE")]
        case: Option<String>,

        /// Catalog directory with filters/ and amplifiers/ JSON files
        #[arg(long, value_name = "DIR")]
        catalog: Option<PathBuf>,
    },

    /// Print a saved board configuration
    Show {
        /// Board model name
        board: BoardModel,
    },

    /// Load a saved configuration and control the board interactively
    Run {
        /// Board model name
        board: BoardModel,
    },

    /// Print the effective settings
    Settings {
        /// Write the effective settings to settings.json
        #[arg(long)]
        write: bool,
    },
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config_dir = cli
        .config_dir
        .clone()
        .or_else(Settings::config_dir)
        .context("no config directory; pass --config-dir")?;
    let settings_path = Settings::settings_path(&config_dir);
    let settings = Settings::load(&settings_path);
    let store = ConfigStore::new(settings.configs_dir(&config_dir));
    tracing::debug!("Using config directory {}", config_dir.display());

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Boards => commands::boards(&mut out),
        Command::Configs => commands::configs(&store, &mut out),
        Command::New {
            board,
            filters,
            amplifier,
            catalog,
        } => {
            let catalog_dir = catalog.unwrap_or_else(|| settings.catalog_dir(&config_dir));
            let device =
                commands::build_device(board, &filters, amplifier.as_deref(), &catalog_dir)?;
            commands::create(&store, &device, &mut out)
        }
        Command::Catalog {
            kind,
            case,
            catalog,
        } => {
            let catalog_dir = catalog.unwrap_or_else(|| settings.catalog_dir(&config_dir));
            commands::catalog(&catalog_dir, kind, case.as_deref(), &mut out)
        }
        Command::Show { board } => commands::show(&store, board, &mut out),
        Command::Run { board } => {
            let simulate = cli.simulate_gpio || settings.simulate_gpio;
            run(&store, &settings, board, simulate, &mut out)
        }
        Command::Settings { write } => {
            if write {
                settings.save(&settings_path)?;
                tracing::info!("Settings written to {}", settings_path.display());
            }
            serde_json::to_writer_pretty(&mut out, &settings)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn run(
    store: &ConfigStore,
    settings: &Settings,
    board: BoardModel,
    simulate: bool,
    out: &mut impl io::Write,
) -> Result<()> {
    let config = store
        .load(board)
        .with_context(|| format!("loading configuration of {}", board))?;
    let mut device = Device::from_config(config)?;

    let gpio = backend::select(simulate);
    device.init_filter_switches(gpio.as_ref(), &settings.filter_pins)?;
    device.init_lna(gpio.as_ref(), &settings.lna_pins)?;
    tracing::info!("Starting control session for {}", board);

    writeln!(out, "{}", device.describe_configuration())?;
    session::run(&mut device, io::stdin().lock(), out)?;
    Ok(())
}
