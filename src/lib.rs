//! rOfficeTracker library root.
//! Exposes the CLI parser, the high-level run() function, and the tracking engine.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod geo;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Setup { .. } => commands::setup::handle(&cli.command, cfg),
        Commands::Mode { .. } => commands::mode::handle(&cli.command, cfg),
        Commands::Start => commands::session::start(cfg),
        Commands::Stop => commands::session::stop(cfg),
        Commands::Status => commands::status::handle(cfg),
        Commands::History { .. } => commands::history::handle(&cli.command, cfg),
        Commands::Radius { .. } => commands::radius::handle(&cli.command, cfg),
        Commands::Sample { .. } => commands::sample::handle(&cli.command, cfg),
        Commands::Watch { .. } => commands::watch::handle(&cli.command, cfg),
        Commands::Reset { .. } => commands::reset::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; a broken file falls back to the defaults
    let (mut cfg, load_error) = match Config::try_load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logging::init_logging(&cfg.log_level, cli.verbose);
    if let Some(e) = load_error {
        tracing::warn!(
            path = %Config::config_file().display(),
            error = %e,
            "ignoring unreadable configuration"
        );
    }

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
