use crate::errors::AppResult;
use crate::session::Session;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// One row of the `audit` table.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an audit line into the `audit` table.
pub fn write(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Audit a committed operation on behalf of `session`.
///
/// The operation already happened; a failing audit insert is reported but
/// does not turn the command into a failure.
pub fn record(conn: &Connection, session: &Session, operation: &str, target: &str, message: &str) {
    let message = format!("{message} [by {}]", session.operator);
    if let Err(e) = write(conn, operation, target, &message) {
        warning(format!("Failed to write audit entry: {e}"));
    }
}

pub fn load_all(conn: &Connection) -> AppResult<Vec<AuditEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM audit ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(AuditEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
