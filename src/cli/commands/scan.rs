use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::scan::{ScanAttempt, ScanOutcome};
use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::scan::WedgeDecoder;
use crate::session::Session;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::fs;
use std::io::{self, Read};

/// Codes given on the command line, a file, or stdin, in that order.
fn capture_frame(codes: &[String], input: Option<&str>) -> AppResult<Vec<u8>> {
    if !codes.is_empty() {
        return Ok(codes.join("\n").into_bytes());
    }

    if let Some(file) = input {
        return Ok(fs::read(expand_tilde(file))?);
    }

    let mut frame = Vec::new();
    io::stdin().read_to_end(&mut frame)?;
    Ok(frame)
}

pub fn handle(cmd: &Commands, cfg: &Config, session: &Session) -> AppResult<()> {
    let Commands::Scan {
        mode,
        action,
        codes,
        input,
    } = cmd
    else {
        return Ok(());
    };

    let action = match action.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => mode.label(cfg).to_string(),
    };

    let frame = capture_frame(codes, input.as_deref())?;
    let pool = DbPool::new(&cfg.database)?;

    match ScanAttempt::new(&pool.conn, &WedgeDecoder, &action).run(frame)? {
        ScanOutcome::Resolved(hit) => {
            success(format!(
                "{} ({}) - {}",
                hit.name, hit.symbol.text, hit.action
            ));
            audit::record(
                &pool.conn,
                session,
                "scan",
                &hit.symbol.text,
                &format!("Logged {} for {} (event {})", hit.action, hit.name, hit.event_id),
            );
        }
        ScanOutcome::Unresolved(symbols) => {
            for s in &symbols {
                warning(format!(
                    "Unbekannter Barcode: {} [{}]",
                    s.text, s.symbology
                ));
            }
            info("Registrieren mit: rattendance add <barcode> <name>");
        }
        ScanOutcome::Empty => {
            info("Kein Barcode erkannt.");
        }
    }

    Ok(())
}
