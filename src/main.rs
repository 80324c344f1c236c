//! Mask Layers CLI
//!
//! Headless driver for the mask layer actions.

use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use mask_layers::cli::{commands, Cli, Commands};
use mask_layers::{ActionOutcome, ActionStatus, MaskConfig, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Mask Layers v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => MaskConfig::load(path)?,
        None => MaskConfig::default(),
    };
    debug!("config: {:?}", config);

    let outcome = handle_command(cli.command, &config)?;
    if outcome.status == ActionStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_command(cmd: Commands, config: &MaskConfig) -> Result<ActionOutcome> {
    match cmd {
        Commands::Init {
            path,
            vertices,
            name,
        } => commands::init(&path, &name, vertices),
        Commands::List { path } => commands::list(&path, config),
        Commands::Add { path } => commands::add(&path, config),
        Commands::Remove { path } => commands::remove(&path),
        Commands::Select { path, index } => commands::select(&path, index),
        Commands::Move { path, direction } => commands::move_layer(&path, direction.into()),
        Commands::Rename { path, index, name } => commands::rename(&path, index, &name, config),
        Commands::Assign { path, yes } => commands::assign(&path, yes, config),
        Commands::Apply { path, index, mode } => {
            commands::apply(&path, index, mode.into(), config)
        }
        Commands::Set { path } => commands::set(&path, config),
        Commands::Invert { path } => commands::invert(&path, config),
        Commands::Clear { path } => commands::clear(&path, config),
        Commands::NewFromMask { path } => commands::new_from_mask(&path, config),
        Commands::Duplicate { path } => commands::duplicate(&path, config),
        Commands::SetMask { path, values } => commands::set_mask(&path, &values, config),
        Commands::Resize { path, vertices } => commands::resize(&path, vertices),
        Commands::Mode { path, mode } => commands::set_mode(&path, mode.into()),
    }
}
