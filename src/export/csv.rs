use crate::errors::{AppError, AppResult};
use crate::export::Exporter;
use crate::models::attendance::AttendanceEvent;
use csv::Writer;

pub const CSV_HEADER: [&str; 5] = ["Barcode-ID", "Name", "Datum", "Uhrzeit", "Aktion"];

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn render(&self, events: &[AttendanceEvent], _label: &str) -> AppResult<Vec<u8>> {
        let mut wtr = Writer::from_writer(Vec::new());

        wtr.write_record(CSV_HEADER)?;

        for ev in events {
            wtr.write_record([
                ev.barcode_id.as_str(),
                ev.name.as_str(),
                ev.date_str().as_str(),
                ev.time_str().as_str(),
                ev.action.as_str(),
            ])?;
        }

        wtr.into_inner()
            .map_err(|e| AppError::Export(format!("CSV flush error: {}", e.error())))
    }
}
