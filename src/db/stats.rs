use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DbStats {
    pub students: i64,
    pub events: i64,
    pub scan_days: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let conn = &pool.conn;

    let students: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    let events: i64 = conn.query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    let scan_days: i64 =
        conn.query_row("SELECT COUNT(DISTINCT date) FROM log", [], |row| row.get(0))?;

    let first_date: Option<String> = conn
        .query_row("SELECT MIN(date) FROM log", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = conn
        .query_row("SELECT MAX(date) FROM log", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(DbStats {
        students,
        events,
        scan_days,
        first_date,
        last_date,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    let stats = collect(pool)?;

    println!(
        "{}• Students:{} {}{}{}",
        CYAN, RESET, GREEN, stats.students, RESET
    );
    println!(
        "{}• Logged events:{} {}{}{} on {} day(s)",
        CYAN, RESET, GREEN, stats.events, RESET, stats.scan_days
    );

    let dash = || format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", stats.first_date.unwrap_or_else(dash));
    println!("    to:   {}", stats.last_date.unwrap_or_else(dash));

    println!();
    Ok(())
}
