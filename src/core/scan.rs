//! One scan attempt: capture → decode → resolve → append or prompt.
//!
//! The attempt is single-shot. Nothing is retried; the operator triggers a
//! new capture to try again.

use crate::core::event_log::EventLog;
use crate::core::registry::Registry;
use crate::errors::AppResult;
use crate::models::attendance::EventId;
use crate::scan::{DecodedSymbol, Decoder};
use rusqlite::Connection;

/// States of a scan attempt. `Resolved`, `Unresolved` and `Empty` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    ImageCaptured(Vec<u8>),
    Decoded(Vec<DecodedSymbol>),
    Resolved(ScanHit),
    Unresolved(Vec<DecodedSymbol>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub event_id: EventId,
    pub symbol: DecodedSymbol,
    pub name: String,
    pub action: String,
}

/// Terminal result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Exactly one event was written.
    Resolved(ScanHit),
    /// Codes were read but none is registered; nothing was written.
    Unresolved(Vec<DecodedSymbol>),
    /// No code in the frame.
    Empty,
}

pub struct ScanAttempt<'a> {
    conn: &'a Connection,
    decoder: &'a dyn Decoder,
    action: String,
    state: ScanState,
}

impl<'a> ScanAttempt<'a> {
    pub fn new(conn: &'a Connection, decoder: &'a dyn Decoder, action: &str) -> Self {
        Self {
            conn,
            decoder,
            action: action.to_string(),
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Hand over the captured frame. Only valid from `Idle`.
    pub fn capture(&mut self, frame: Vec<u8>) -> &ScanState {
        if self.state == ScanState::Idle {
            self.state = ScanState::ImageCaptured(frame);
        }
        &self.state
    }

    /// Advance one step. Terminal states stay where they are. A failing step
    /// leaves the current state in place so the caller can retry it.
    pub fn step(&mut self) -> AppResult<&ScanState> {
        let next = match &self.state {
            ScanState::ImageCaptured(frame) => Some(ScanState::Decoded(self.decoder.decode(frame)?)),
            ScanState::Decoded(symbols) if symbols.is_empty() => Some(ScanState::Empty),
            ScanState::Decoded(symbols) => Some(self.resolve(symbols)?),
            _ => None,
        };

        if let Some(next) = next {
            self.state = next;
        }
        Ok(&self.state)
    }

    fn resolve(&self, symbols: &[DecodedSymbol]) -> AppResult<ScanState> {
        let registry = Registry::new(self.conn);

        for symbol in symbols {
            if let Some(name) = registry.lookup(&symbol.text)? {
                let event_id = EventLog::new(self.conn).append(&symbol.text, &name, &self.action)?;
                return Ok(ScanState::Resolved(ScanHit {
                    event_id,
                    symbol: symbol.clone(),
                    name,
                    action: self.action.clone(),
                }));
            }
        }

        Ok(ScanState::Unresolved(symbols.to_vec()))
    }

    /// Drive the attempt to a terminal state.
    pub fn run(mut self, frame: Vec<u8>) -> AppResult<ScanOutcome> {
        self.capture(frame);
        loop {
            match self.step()? {
                ScanState::Resolved(hit) => return Ok(ScanOutcome::Resolved(hit.clone())),
                ScanState::Unresolved(symbols) => {
                    return Ok(ScanOutcome::Unresolved(symbols.clone()));
                }
                ScanState::Empty => return Ok(ScanOutcome::Empty),
                ScanState::Idle => return Ok(ScanOutcome::Empty),
                ScanState::ImageCaptured(_) | ScanState::Decoded(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::errors::AppError;
    use crate::scan::WedgeDecoder;
    use chrono::Local;

    /// Returns a fixed symbol list whatever the frame.
    struct FixedDecoder(Vec<DecodedSymbol>);

    impl Decoder for FixedDecoder {
        fn decode(&self, _frame: &[u8]) -> AppResult<Vec<DecodedSymbol>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDecoder;

    impl Decoder for BrokenDecoder {
        fn decode(&self, _frame: &[u8]) -> AppResult<Vec<DecodedSymbol>> {
            Err(AppError::Other("camera unplugged".into()))
        }
    }

    fn today_events(pool: &DbPool) -> usize {
        EventLog::new(&pool.conn)
            .query_by_date(Local::now().date_naive())
            .unwrap()
            .len()
    }

    #[test]
    fn first_registered_candidate_wins_and_logs_once() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("222", "Bernd").unwrap();
        reg.register("333", "Clara").unwrap();

        let decoder = FixedDecoder(vec![
            DecodedSymbol::new("QRCODE", "111"),
            DecodedSymbol::new("CODE128", "222"),
            DecodedSymbol::new("CODE128", "333"),
        ]);

        let outcome = ScanAttempt::new(&pool.conn, &decoder, "check-in")
            .run(Vec::new())
            .unwrap();

        match outcome {
            ScanOutcome::Resolved(hit) => {
                assert_eq!(hit.symbol.text, "222");
                assert_eq!(hit.name, "Bernd");
                assert_eq!(hit.action, "check-in");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(today_events(&pool), 1);
    }

    #[test]
    fn unknown_codes_write_nothing() {
        let pool = DbPool::in_memory().unwrap();
        let outcome = ScanAttempt::new(&pool.conn, &WedgeDecoder, "check-in")
            .run(b"999\n]C0888".to_vec())
            .unwrap();

        match outcome {
            ScanOutcome::Unresolved(symbols) => {
                let texts: Vec<&str> = symbols.iter().map(|s| s.text.as_str()).collect();
                assert_eq!(texts, ["999", "888"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(today_events(&pool), 0);
    }

    #[test]
    fn empty_frame_is_not_an_error() {
        let pool = DbPool::in_memory().unwrap();
        let outcome = ScanAttempt::new(&pool.conn, &WedgeDecoder, "check-in")
            .run(b"\n".to_vec())
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Empty);
    }

    #[test]
    fn states_advance_in_order() {
        let pool = DbPool::in_memory().unwrap();
        Registry::new(&pool.conn).register("123", "Anna").unwrap();

        let mut attempt = ScanAttempt::new(&pool.conn, &WedgeDecoder, "check-out");
        assert_eq!(attempt.state(), &ScanState::Idle);

        attempt.capture(b"123\n".to_vec());
        assert!(matches!(attempt.state(), ScanState::ImageCaptured(_)));

        assert!(matches!(attempt.step().unwrap(), ScanState::Decoded(s) if s.len() == 1));
        assert!(matches!(attempt.step().unwrap(), ScanState::Resolved(h) if h.name == "Anna"));

        // terminal: stepping again writes nothing more
        attempt.step().unwrap();
        assert_eq!(today_events(&pool), 1);
    }

    #[test]
    fn repeated_scans_are_not_deduplicated() {
        let pool = DbPool::in_memory().unwrap();
        Registry::new(&pool.conn).register("123", "Anna").unwrap();

        for _ in 0..2 {
            let outcome = ScanAttempt::new(&pool.conn, &WedgeDecoder, "check-in")
                .run(b"123".to_vec())
                .unwrap();
            assert!(matches!(outcome, ScanOutcome::Resolved(_)));
        }
        assert_eq!(today_events(&pool), 2);
    }

    #[test]
    fn failed_decode_keeps_the_captured_frame() {
        let pool = DbPool::in_memory().unwrap();
        let mut attempt = ScanAttempt::new(&pool.conn, &BrokenDecoder, "check-in");
        attempt.capture(b"123".to_vec());

        assert!(attempt.step().is_err());
        assert_eq!(attempt.state(), &ScanState::ImageCaptured(b"123".to_vec()));
        assert_eq!(today_events(&pool), 0);
    }
}
