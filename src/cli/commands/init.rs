use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the `admin` account hash, only while no account is configured
///  - the SQLite schema
///
/// An existing config file is loaded and completed, never rebuilt.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let Commands::Init { admin_password } = &cli.command else {
        return Ok(());
    };

    let path = Config::config_file();
    let mut cfg = Config::load_from(&path)?;
    let created_admin = cfg.apply_init(cli.db.as_deref(), admin_password)?;

    println!("⚙️  Initializing rattendance…");
    if !created_admin {
        info("Accounts already configured: keeping existing credentials.");
    }
    if cli.test {
        info("Test mode: configuration file left untouched.");
    } else {
        cfg.save_to(&path)?;
        println!("📄 Config file : {}", path.display());
    }
    println!("🗄️  Database   : {}", cfg.database);

    if let Some(dir) = Path::new(&cfg.database)
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
    {
        fs::create_dir_all(dir)?;
    }

    let pool = DbPool::new(&cfg.database)?;

    if let Err(e) = audit::write(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {}", cfg.database),
    ) {
        warning(format!("Failed to write audit entry: {e}"));
    }

    success("rattendance initialization completed!");
    Ok(())
}
