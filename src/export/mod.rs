// src/export/mod.rs

mod csv;
mod fs_utils;
mod json;
pub mod logic;
mod pdf;

pub(crate) use fs_utils::ensure_writable;
pub use self::csv::{CSV_HEADER, CsvExporter};
pub use json::JsonExporter;
pub use logic::ExportLogic;
pub use pdf::{PdfExporter, pdf_title};

use crate::errors::AppResult;
use crate::models::attendance::AttendanceEvent;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Row set + label → file contents.
pub trait Exporter {
    fn render(&self, events: &[AttendanceEvent], label: &str) -> AppResult<Vec<u8>>;
}

/// Shared completion message for all formats.
pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!(
        "{label} export completed: {} ({rows} row(s))",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Csv => Box::new(CsvExporter),
            ExportFormat::Pdf => Box::new(PdfExporter),
            ExportFormat::Json => Box::new(JsonExporter),
        }
    }
}
