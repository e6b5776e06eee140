//! rattendance library root.
//! Exposes the CLI parser, the high-level run() function and the services
//! behind it (registry, event log, scan, roster import, export).

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod roster;
pub mod scan;
pub mod session;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};
use session::Session;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, session: Option<&Session>) -> AppResult<()> {
    let cmd = &cli.command;

    // init and config run before anybody can log in
    match cmd {
        Commands::Init { .. } => return cli::commands::init::handle(cli),
        Commands::Config { .. } => return cli::commands::config::handle(cmd, cfg),
        _ => {}
    }

    let session = session.ok_or_else(|| AppError::Auth(String::new()))?;

    match cmd {
        Commands::Add { .. }
        | Commands::Rename { .. }
        | Commands::Del { .. }
        | Commands::Students => cli::commands::student::handle(cmd, cfg, session),
        Commands::Db { .. } => cli::commands::db::handle(cmd, cfg),
        Commands::Scan { .. } => cli::commands::scan::handle(cmd, cfg, session),
        Commands::Log { .. } => cli::commands::log::handle(cmd, cfg),
        Commands::Export { .. } => cli::commands::export::handle(cmd, cfg),
        Commands::Roster { .. } => cli::commands::roster::handle(cmd, cfg, session),
        Commands::Audit => cli::commands::audit::handle(cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(cmd, cfg, session),
        Commands::Init { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// Diagnostics go to stderr, filtered by `RATTENDANCE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RATTENDANCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let session = if cli.command.needs_login() {
        let backend = auth::backend_for(&cfg);
        let user = cli.user.as_deref().unwrap_or_default();
        let password = cli.password.as_deref().unwrap_or_default();
        Some(Session::login(backend.as_ref(), user, password)?)
    } else {
        None
    };

    dispatch(&cli, &cfg, session.as_ref())
}
