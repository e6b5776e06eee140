use super::{RosterReply, RosterRequest, RosterSource};
use crate::errors::{AppError, AppResult};
use std::time::Duration;

/// Retries remote failures a fixed number of times, sleeping
/// `backoff * attempt` between tries.
pub struct RetryingRoster<S> {
    inner: S,
    attempts: u32,
    backoff: Duration,
    sleep: fn(Duration),
}

impl<S: RosterSource> RetryingRoster<S> {
    pub fn new(inner: S, attempts: u32, backoff: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            backoff,
            sleep: std::thread::sleep,
        }
    }

    /// Replace the sleep function (tests record delays instead of waiting).
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }
}

impl<S: RosterSource> RosterSource for RetryingRoster<S> {
    fn fetch(&self, request: RosterRequest) -> AppResult<RosterReply> {
        let mut last_cause = String::new();

        for attempt in 1..=self.attempts {
            match self.inner.fetch(request) {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_remote() => {
                    tracing::warn!(
                        attempt,
                        max = self.attempts,
                        request = request.as_str(),
                        error = %e,
                        "roster request failed"
                    );
                    last_cause = match e {
                        AppError::Remote(cause) => cause,
                        other => other.to_string(),
                    };
                    if attempt < self.attempts {
                        (self.sleep)(self.backoff * attempt);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::RemoteUnavailable {
            attempts: self.attempts,
            cause: last_cause,
        })
    }
}
