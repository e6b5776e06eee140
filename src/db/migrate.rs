//! Idempotent schema management.
//!
//! There is no schema version table: every table is created with
//! `CREATE TABLE IF NOT EXISTS` and columns added after the first release are
//! appended with `ALTER TABLE ... ADD COLUMN` when an older file lacks them.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

/// Columns added to `students` after the first release: (name, SQL type).
const STUDENT_LATE_COLUMNS: &[(&str, &str)] = &[("untis_student_id", "TEXT"), ("klass", "TEXT")];

pub fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

pub fn has_column(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn ensure_students_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id               TEXT PRIMARY KEY,
            name             TEXT NOT NULL,
            untis_student_id TEXT,
            klass            TEXT
        );
        "#,
    )?;

    for (column, sql_type) in STUDENT_LATE_COLUMNS {
        if !has_column(conn, "students", column)? {
            tracing::info!(column, "adding missing column to students");
            conn.execute_batch(&format!(
                "ALTER TABLE students ADD COLUMN {column} {sql_type};"
            ))
            .map_err(|e| AppError::Migration(format!("students.{column}: {e}")))?;
        }
    }

    Ok(())
}

fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT,
            name       TEXT,
            date       TEXT,
            time       TEXT,
            action     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_log_date_time ON log(date, time);
        "#,
    )?;
    Ok(())
}

fn ensure_audit_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS audit (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Bring any database file (new, legacy two-column, or current) to the
/// current schema without touching existing rows.
pub fn ensure_schema(conn: &Connection) -> AppResult<()> {
    ensure_students_table(conn)?;
    ensure_log_table(conn)?;
    ensure_audit_table(conn)?;
    Ok(())
}
