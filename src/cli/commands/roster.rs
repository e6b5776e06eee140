use crate::cli::parser::{Commands, RosterAction};
use crate::config::Config;
use crate::core::registry::{Registry, Upsert};
use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::student::{normalize_optional, validate_barcode, validate_name};
use crate::roster::{RosterRequest, RosterSource, RosterStudent, filter_by_class, source_for};
use crate::session::Session;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_optional_field};
use crate::utils::table::Table;

fn fetch_students(cfg: &Config, refresh: bool) -> AppResult<Vec<RosterStudent>> {
    source_for(cfg, refresh)?
        .fetch(RosterRequest::Students)?
        .into_students()
}

fn print_classes(cfg: &Config, refresh: bool) -> AppResult<()> {
    let classes = source_for(cfg, refresh)?
        .fetch(RosterRequest::Classes)?
        .into_classes()?;

    if classes.is_empty() {
        info("WebUntis liefert keine Klassen.");
        return Ok(());
    }
    for c in &classes {
        println!("  {c}");
    }
    println!("\n{} Klassen", classes.len());
    Ok(())
}

fn print_students(cfg: &Config, class: Option<&str>, refresh: bool) -> AppResult<()> {
    let all = fetch_students(cfg, refresh)?;

    if class.is_some() && all.iter().all(|s| s.class_label.is_none()) {
        warning("WebUntis liefert keine Klassenzuordnung; der Klassenfilter findet nichts.");
    }

    let students = filter_by_class(all, class);
    if students.is_empty() {
        info("Keine Schüler gefunden.");
        return Ok(());
    }

    let mut table = Table::new(["WebUntis-ID", "Name", "Klasse"]);
    for s in &students {
        table.add_row(vec![
            s.roster_id.clone(),
            s.name.clone(),
            s.class_label.clone().unwrap_or_default(),
        ]);
    }
    print!("{}", table.render());
    println!("\n{} Schüler", students.len());
    Ok(())
}

fn map(
    cfg: &Config,
    session: &Session,
    barcode: &str,
    name: Option<&str>,
    class: Option<&str>,
    roster_id: Option<&str>,
) -> AppResult<()> {
    let barcode = validate_barcode(barcode)?;
    let roster_id = normalize_optional(roster_id);
    let mut class = normalize_optional(class);

    let name = match (name, roster_id.as_deref()) {
        (Some(n), _) => validate_name(n)?,
        (None, Some(id)) => {
            let entry = fetch_students(cfg, false)?
                .into_iter()
                .find(|s| s.roster_id == id)
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("WebUntis student id '{id}' not found"))
                })?;
            if class.is_none() {
                class = entry.class_label;
            }
            entry.name
        }
        (None, None) => {
            return Err(AppError::InvalidInput(
                "either --name or --roster-id is required".into(),
            ));
        }
    };

    let pool = DbPool::new(&cfg.database)?;
    let outcome =
        Registry::new(&pool.conn).upsert_mapping(&barcode, &name, class.as_deref(), roster_id.as_deref())?;

    let verb = match outcome {
        Upsert::Inserted => "angelegt",
        Upsert::Updated => "aktualisiert",
    };
    success(format!("Zuordnung {barcode} → '{name}' {verb}."));
    audit::record(
        &pool.conn,
        session,
        "map",
        &barcode,
        &format!(
            "Mapped to {name} (class {}, roster id {})",
            class.as_deref().unwrap_or("-"),
            roster_id.as_deref().unwrap_or("-")
        ),
    );
    Ok(())
}

fn print_mappings(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let students = Registry::new(&pool.conn).list_all()?;

    if students.is_empty() {
        info("Keine Zuordnungen vorhanden.");
        return Ok(());
    }

    let mut table = Table::new(["Barcode-ID", "Name", "Klasse", "WebUntis-ID"]);
    for s in &students {
        table.add_row(vec![
            s.barcode_id.clone(),
            s.name.clone(),
            s.class_label.clone().unwrap_or_else(|| "--".into()),
            s.roster_id.clone().unwrap_or_else(|| "--".into()),
        ]);
    }

    let rendered = table.render();
    let mut lines = rendered.lines();
    for line in lines.by_ref().take(2) {
        println!("{line}");
    }
    for (line, s) in lines.zip(&students) {
        // rows without a roster id in grey
        let color = color_for_optional_field(s.roster_id.as_deref());
        println!("{color}{line}{RESET}");
    }
    println!("\n{} Zuordnungen", students.len());
    Ok(())
}

fn unmap(cfg: &Config, session: &Session, barcode: &str) -> AppResult<()> {
    let barcode = validate_barcode(barcode)?;
    let pool = DbPool::new(&cfg.database)?;

    if Registry::new(&pool.conn).remove(&barcode)? > 0 {
        success(format!("Zuordnung für {barcode} entfernt."));
        audit::record(&pool.conn, session, "unmap", &barcode, "Mapping removed");
    } else {
        info(format!("Barcode {barcode} war nicht zugeordnet, nichts zu tun."));
    }
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config, session: &Session) -> AppResult<()> {
    let Commands::Roster { action } = cmd else {
        return Ok(());
    };

    match action {
        RosterAction::Classes { refresh } => print_classes(cfg, *refresh),
        RosterAction::Students { class, refresh } => {
            print_students(cfg, class.as_deref(), *refresh)
        }
        RosterAction::Map {
            barcode,
            name,
            class,
            roster_id,
        } => map(
            cfg,
            session,
            barcode,
            name.as_deref(),
            class.as_deref(),
            roster_id.as_deref(),
        ),
        RosterAction::Mappings => print_mappings(cfg),
        RosterAction::Unmap { barcode } => unmap(cfg, session, barcode),
    }
}
