use crate::errors::AppResult;
use crate::export::Exporter;
use crate::models::attendance::AttendanceEvent;
use serde::Serialize;

#[derive(Serialize)]
struct JsonLogbook<'a> {
    label: &'a str,
    events: Vec<JsonEvent<'a>>,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    id: i64,
    barcode_id: &'a str,
    name: &'a str,
    date: String,
    time: String,
    action: &'a str,
}

/// Pretty-printed JSON logbook.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn render(&self, events: &[AttendanceEvent], label: &str) -> AppResult<Vec<u8>> {
        let doc = JsonLogbook {
            label,
            events: events
                .iter()
                .map(|e| JsonEvent {
                    id: e.id,
                    barcode_id: &e.barcode_id,
                    name: &e.name,
                    date: e.date_str(),
                    time: e.time_str(),
                    action: &e.action,
                })
                .collect(),
        };

        Ok(serde_json::to_vec_pretty(&doc)?)
    }
}
