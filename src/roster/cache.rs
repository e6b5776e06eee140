use super::{RosterReply, RosterRequest, RosterSource};
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    reply: RosterReply,
}

type CacheFile = BTreeMap<String, CacheEntry>;

/// Keeps roster replies on disk for `ttl`; roster data changes rarely, so a
/// stale-by-minutes answer is fine.
pub struct CachedRoster<S> {
    inner: S,
    path: PathBuf,
    key: String,
    ttl: Duration,
}

impl<S: RosterSource> CachedRoster<S> {
    pub fn new(inner: S, path: PathBuf, key: String, ttl: Duration) -> Self {
        Self {
            inner,
            path,
            key,
            ttl,
        }
    }

    fn entry_key(&self, request: RosterRequest) -> String {
        format!("{}|{}", self.key, request.as_str())
    }

    fn read_file(&self) -> CacheFile {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return CacheFile::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable roster cache");
            CacheFile::new()
        })
    }

    fn lookup(&self, request: RosterRequest) -> Option<RosterReply> {
        if self.ttl.is_zero() {
            return None;
        }

        let entry = self.read_file().remove(&self.entry_key(request))?;
        let age = Utc::now().signed_duration_since(entry.fetched_at);
        let fresh = age
            .to_std()
            .map(|age| age < self.ttl)
            .unwrap_or(false);

        if fresh {
            tracing::debug!(request = request.as_str(), "roster cache hit");
            Some(entry.reply)
        } else {
            None
        }
    }

    fn store(&self, request: RosterRequest, reply: &RosterReply) {
        let mut file = self.read_file();
        file.insert(
            self.entry_key(request),
            CacheEntry {
                fetched_at: Utc::now(),
                reply: reply.clone(),
            },
        );

        let result = serde_json::to_string_pretty(&file)
            .map_err(crate::errors::AppError::from)
            .and_then(|json| {
                if let Some(dir) = self.path.parent() {
                    fs::create_dir_all(dir)?;
                }
                fs::write(&self.path, json)?;
                Ok(())
            });

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write roster cache");
        }
    }
}

impl<S: RosterSource> RosterSource for CachedRoster<S> {
    fn fetch(&self, request: RosterRequest) -> AppResult<RosterReply> {
        if let Some(reply) = self.lookup(request) {
            return Ok(reply);
        }

        let reply = self.inner.fetch(request)?;
        self.store(request, &reply);
        Ok(reply)
    }
}
