//! Append-only attendance log.

use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, DATE_FMT, EventId, TIME_FMT};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, Row, params};

pub struct EventLog<'c> {
    conn: &'c Connection,
}

fn conversion_error(column: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn map_event(row: &Row) -> rusqlite::Result<AttendanceEvent> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .map_err(|_| conversion_error(3, AppError::InvalidDate(date_str.clone())))?;

    // rows written by older versions may lack seconds
    let time = NaiveTime::parse_from_str(&time_str, TIME_FMT)
        .or_else(|_| NaiveTime::parse_from_str(&time_str, "%H:%M"))
        .map_err(|_| {
            conversion_error(4, AppError::InvalidInput(format!("invalid time '{time_str}'")))
        })?;

    Ok(AttendanceEvent {
        id: row.get("id")?,
        barcode_id: row.get::<_, Option<String>>("student_id")?.unwrap_or_default(),
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        date,
        time,
        action: row.get::<_, Option<String>>("action")?.unwrap_or_default(),
    })
}

impl<'c> EventLog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Record an event stamped with the local wall clock.
    pub fn append(&self, barcode_id: &str, name_snapshot: &str, action: &str) -> AppResult<EventId> {
        self.append_at(barcode_id, name_snapshot, action, Local::now().naive_local())
    }

    pub fn append_at(
        &self,
        barcode_id: &str,
        name_snapshot: &str,
        action: &str,
        at: NaiveDateTime,
    ) -> AppResult<EventId> {
        self.conn.execute(
            "INSERT INTO log (student_id, name, date, time, action)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                barcode_id,
                name_snapshot,
                at.format(DATE_FMT).to_string(),
                at.format(TIME_FMT).to_string(),
                action,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, barcode = barcode_id, action, "attendance event appended");
        Ok(id)
    }

    /// Events of one day, by time of day then sequence.
    pub fn query_by_date(&self, date: NaiveDate) -> AppResult<Vec<AttendanceEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, student_id, name, date, time, action FROM log
             WHERE date = ?1
             ORDER BY time ASC, id ASC",
        )?;

        let rows = stmt.query_map([date.format(DATE_FMT).to_string()], map_event)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn dates_with_events(&self) -> AppResult<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT date FROM log ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            let d = r?;
            let date = NaiveDate::parse_from_str(&d, DATE_FMT)
                .map_err(|_| AppError::InvalidDate(d.clone()))?;
            out.push(date);
        }
        Ok(out)
    }
}
