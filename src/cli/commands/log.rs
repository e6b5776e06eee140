use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attendance::DATE_FMT;
use crate::ui::messages::{header, info};
use crate::utils::colors::{LEGACY_CHECK_IN, LEGACY_CHECK_OUT, colorize_action};
use crate::utils::date::date_or_today;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { date } = cmd else {
        return Ok(());
    };

    let date = date_or_today(date.as_deref())?;
    let pool = DbPool::new(&cfg.database)?;
    let log = EventLog::new(&pool.conn);
    let events = log.query_by_date(date)?;

    let day = date.format(DATE_FMT).to_string();

    if events.is_empty() {
        info(format!("Keine Einträge für {day}."));
        if let Some(last) = log.dates_with_events()?.last() {
            info(format!("Letzter Tag mit Einträgen: {}", last.format(DATE_FMT)));
        }
        return Ok(());
    }

    header(format!("Logbuch {day}"));

    let mut table = Table::new(["Uhrzeit", "Barcode-ID", "Name", "Aktion"]);
    for ev in &events {
        table.add_row(vec![
            ev.time_str(),
            ev.barcode_id.clone(),
            ev.name.clone(),
            ev.action.clone(),
        ]);
    }

    // color after layout so escape codes don't skew the widths
    for line in table.render().lines() {
        let mut out = line.to_string();
        let labels = [
            cfg.check_in_label.as_str(),
            cfg.check_out_label.as_str(),
            LEGACY_CHECK_IN,
            LEGACY_CHECK_OUT,
        ];
        for label in labels {
            if out.ends_with(label) {
                let cut = out.len() - label.len();
                out.truncate(cut);
                out.push_str(&colorize_action(label, &cfg.check_in_label, &cfg.check_out_label));
                break;
            }
        }
        println!("{out}");
    }
    println!("\n{} Einträge", events.len());

    Ok(())
}
