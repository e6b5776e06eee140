use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::date::date_or_today;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        date,
        format,
        file,
        force,
    } = cmd
    {
        let date = date_or_today(date.as_deref())?;
        let pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(&pool, date, *format, file.as_deref(), *force)?;
    }
    Ok(())
}
