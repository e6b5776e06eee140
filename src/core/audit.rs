use crate::db::audit::{self, AuditEntry};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

const OP_COLUMN_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    let re = ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));
    re.replace_all(s, "").into_owned()
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "map" => Colour::Green,
        "del" | "unmap" => Colour::Red,
        "rename" => Colour::Yellow,
        "scan" => Colour::Cyan,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `op (target)` cut to the column limit; only the operation word is colored.
fn op_target_cell(entry: &AuditEntry) -> String {
    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = if plain.width() > OP_COLUMN_MAX {
        let mut s: String = plain.chars().take(OP_COLUMN_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&entry.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Render audit rows as aligned lines.
pub fn format_entries(entries: &[AuditEntry]) -> Vec<String> {
    let cells: Vec<(String, String)> = entries
        .iter()
        .map(|e| (display_date(&e.date), op_target_cell(e)))
        .collect();

    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = cells.iter().map(|(d, _)| d.width()).max().unwrap_or(0);
    let op_w = cells
        .iter()
        .map(|(_, op)| strip_ansi(op).width())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .zip(cells)
        .map(|(e, (date, op))| {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).width()));
            format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id, date, op, padding, e.message
            )
        })
        .collect()
}

pub struct AuditLogic;

impl AuditLogic {
    pub fn print_audit(pool: &DbPool) -> AppResult<()> {
        let entries = audit::load_all(&pool.conn)?;

        if entries.is_empty() {
            info("Keine Audit-Einträge vorhanden.");
            return Ok(());
        }

        println!("📜 Audit:\n");
        for line in format_entries(&entries) {
            println!("{line}");
        }
        Ok(())
    }
}
