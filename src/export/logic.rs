// src/export/logic.rs

use crate::core::event_log::EventLog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::fs_utils::{ensure_writable, write_output};
use crate::export::{ExportFormat, notify_export_success};
use crate::models::attendance::DATE_FMT;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::PathBuf;

/// `logbuch_<date>.<ext>`
pub fn default_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("logbuch_{}.{}", date.format(DATE_FMT), format.as_str())
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export one day of the log.
    ///
    /// Returns the written path, or `None` when the day has no events
    /// (a warning is printed and no file is created).
    pub fn export(
        pool: &DbPool,
        date: NaiveDate,
        format: ExportFormat,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let events = EventLog::new(&pool.conn).query_by_date(date)?;

        if events.is_empty() {
            warning(format!(
                "Keine Einträge für {} gefunden, nichts exportiert.",
                date.format(DATE_FMT)
            ));
            return Ok(None);
        }

        let path = match file {
            Some(f) => crate::utils::path::expand_tilde(f),
            None => PathBuf::from(default_file_name(date, format)),
        };

        ensure_writable(&path, force)?;

        let label = date.format(DATE_FMT).to_string();
        let bytes = format.exporter().render(&events, &label)?;
        write_output(&path, &bytes)?;

        tracing::debug!(path = %path.display(), rows = events.len(), format = format.as_str(), "export written");
        notify_export_success(&format.as_str().to_uppercase(), &path, events.len());

        Ok(Some(path))
    }
}
