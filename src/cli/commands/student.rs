use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::registry::Registry;
use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::student::{validate_barcode, validate_name};
use crate::session::Session;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

/// `add`, `rename`, `del` and `students`.
pub fn handle(cmd: &Commands, cfg: &Config, session: &Session) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let registry = Registry::new(&pool.conn);

    match cmd {
        Commands::Add { barcode, name } => {
            let barcode = validate_barcode(barcode)?;
            let name = validate_name(name)?;

            registry.register(&barcode, &name)?;
            success(format!("Schüler '{name}' mit Barcode {barcode} registriert."));
            audit::record(&pool.conn, session, "add", &barcode, &format!("Registered {name}"));
        }

        Commands::Rename { barcode, name } => {
            let barcode = validate_barcode(barcode)?;
            let name = validate_name(name)?;

            if registry.rename(&barcode, &name)? == 0 {
                return Err(AppError::NotFound(barcode));
            }
            success(format!("Barcode {barcode} heißt jetzt '{name}'."));
            audit::record(&pool.conn, session, "rename", &barcode, &format!("Renamed to {name}"));
        }

        Commands::Del { barcode } => {
            let barcode = validate_barcode(barcode)?;

            if registry.remove(&barcode)? > 0 {
                success(format!("Schüler mit Barcode {barcode} gelöscht."));
                audit::record(&pool.conn, session, "del", &barcode, "Student deleted");
            } else {
                info(format!("Barcode {barcode} war nicht registriert, nichts zu tun."));
            }
        }

        Commands::Students => {
            let students = registry.list_all()?;
            if students.is_empty() {
                info("Noch keine Schüler registriert.");
                return Ok(());
            }

            let mut table = Table::new(["Barcode-ID", "Name", "Klasse"]);
            for s in &students {
                table.add_row(vec![
                    s.barcode_id.clone(),
                    s.name.clone(),
                    s.class_label.clone().unwrap_or_default(),
                ]);
            }
            print!("{}", table.render());
            println!("\n{} Schüler", students.len());
        }

        _ => {}
    }

    Ok(())
}
