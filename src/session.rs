//! Per-invocation operator context.

use crate::auth::CredentialCheck;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct Session {
    pub operator: String,
    pub started_at: DateTime<Local>,
}

impl Session {
    pub fn login(check: &dyn CredentialCheck, username: &str, password: &str) -> AppResult<Self> {
        let username = username.trim();
        if username.is_empty() || !check.verify(username, password) {
            tracing::warn!(user = username, "login rejected");
            return Err(AppError::Auth(username.to_string()));
        }

        tracing::debug!(user = username, "login accepted");
        Ok(Self {
            operator: username.to_string(),
            started_at: Local::now(),
        })
    }
}
