//! Unified application error type.
//! Every layer (db, core, roster, export, cli) returns AppError so that a
//! failure reaches the operator through one path and one message format.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Registry
    // ---------------------------
    #[error("Barcode ID '{0}' is already registered")]
    DuplicateKey(String),

    #[error("No student registered with barcode ID '{0}'")]
    NotFound(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    // ---------------------------
    // Session
    // ---------------------------
    #[error("Authentication failed for user '{0}'")]
    Auth(String),

    // ---------------------------
    // Roster import
    // ---------------------------
    #[error("Roster service error: {0}")]
    Remote(String),

    #[error("Roster service unavailable after {attempts} attempt(s): {cause}")]
    RemoteUnavailable { attempts: u32, cause: String },

    // ---------------------------
    // Config
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Remote(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {e}"))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl AppError {
    /// True for failures a retry of the remote roster call may cure.
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Remote(_) | AppError::RemoteUnavailable { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
