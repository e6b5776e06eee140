use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Store-assigned sequence number of a log row.
pub type EventId = i64;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendanceEvent {
    pub id: EventId,          // ⇔ log.id (AUTOINCREMENT)
    pub barcode_id: String,   // ⇔ log.student_id (no FK)
    pub name: String,         // ⇔ log.name, snapshot at scan time
    pub date: NaiveDate,      // ⇔ log.date "YYYY-MM-DD"
    pub time: NaiveTime,      // ⇔ log.time "HH:MM:SS"
    pub action: String,       // ⇔ log.action, free text
}

impl AttendanceEvent {
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FMT).to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(TIME_FMT).to_string()
    }

    /// `<date> <time> - <name> (<barcode>) - <action>`, the logbook line format.
    pub fn logbook_line(&self) -> String {
        format!(
            "{} {} - {} ({}) - {}",
            self.date_str(),
            self.time_str(),
            self.name,
            self.barcode_id,
            self.action
        )
    }
}
