use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::ensure_schema;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    // opening already brings the schema up to date
    let pool = DbPool::new(&cfg.database)?;

    if *migrate {
        println!("{CYAN}▶ Checking schema…{RESET}");
        ensure_schema(&pool.conn)?;
        println!("{GREEN}✔ Schema is up to date.{RESET}\n");
    }

    if *info {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    if *check {
        println!("{CYAN}▶ Running integrity check…{RESET}");

        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{GREEN}✔ Integrity check passed.{RESET}\n");
        } else {
            println!("{RED}✘ Integrity check failed:{RESET} {integrity}\n");
        }
    }

    if *vacuum {
        println!("{CYAN}▶ Running VACUUM…{RESET}");
        pool.conn.execute_batch("VACUUM;")?;
        println!("{GREEN}✔ Vacuum completed.{RESET}\n");
    }

    Ok(())
}
