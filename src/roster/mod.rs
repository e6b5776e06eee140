//! Roster import from a timetabling service.
//!
//! ```text
//! RosterSource (trait)
//!     |
//!     +-- CachedRoster    file-backed TTL cache, wraps any source
//!     +-- RetryingRoster  fixed attempts, linear backoff, wraps any source
//!     +-- WebUntisClient  JSON-RPC client for WebUntis
//! ```

pub mod cache;
pub mod retry;
pub mod webuntis;

use crate::config::{Config, RosterConfig};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use cache::CachedRoster;
pub use retry::RetryingRoster;
pub use webuntis::WebUntisClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterRequest {
    Classes,
    Students,
}

impl RosterRequest {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterRequest::Classes => "classes",
            RosterRequest::Students => "students",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStudent {
    pub roster_id: String,
    pub name: String,
    pub class_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RosterReply {
    Classes(Vec<String>),
    Students(Vec<RosterStudent>),
}

impl RosterReply {
    pub fn into_classes(self) -> AppResult<Vec<String>> {
        match self {
            RosterReply::Classes(c) => Ok(c),
            RosterReply::Students(_) => Err(AppError::Remote(
                "expected a class list, got a student list".into(),
            )),
        }
    }

    pub fn into_students(self) -> AppResult<Vec<RosterStudent>> {
        match self {
            RosterReply::Students(s) => Ok(s),
            RosterReply::Classes(_) => Err(AppError::Remote(
                "expected a student list, got a class list".into(),
            )),
        }
    }
}

pub trait RosterSource {
    fn fetch(&self, request: RosterRequest) -> AppResult<RosterReply>;
}

impl<S: RosterSource + ?Sized> RosterSource for Box<S> {
    fn fetch(&self, request: RosterRequest) -> AppResult<RosterReply> {
        (**self).fetch(request)
    }
}

/// Students of one class; `None` keeps everyone.
pub fn filter_by_class(students: Vec<RosterStudent>, class: Option<&str>) -> Vec<RosterStudent> {
    match class.map(str::trim).filter(|c| !c.is_empty()) {
        None => students,
        Some(class) => students
            .into_iter()
            .filter(|s| s.class_label.as_deref() == Some(class))
            .collect(),
    }
}

/// The production stack: cache → retry → WebUntis.
pub fn source_for(cfg: &Config, refresh: bool) -> AppResult<Box<dyn RosterSource>> {
    let rc: &RosterConfig = &cfg.roster;
    if !rc.is_configured() {
        return Err(AppError::Config(
            "roster section is incomplete: set roster.school and roster.username in the config file"
                .into(),
        ));
    }

    let client = WebUntisClient::new(rc)?;
    let retrying = RetryingRoster::new(
        client,
        rc.attempts,
        Duration::from_millis(rc.backoff_ms),
    );

    let ttl = if refresh {
        Duration::ZERO
    } else {
        Duration::from_secs(rc.cache_ttl_secs)
    };
    let key = format!("{}|{}|{}", rc.server, rc.school, rc.username);

    Ok(Box::new(CachedRoster::new(
        retrying,
        Config::roster_cache_file(),
        key,
        ttl,
    )))
}
