use crate::db::migrate::ensure_schema;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Table creation and column upgrades are idempotent, so this runs on every open.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    ensure_schema(conn)?;
    Ok(())
}
