use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::session::Session;

pub fn handle(cmd: &Commands, cfg: &Config, session: &Session) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        BackupLogic::backup(&pool, session, &cfg.database, file, *compress)?;
    }

    Ok(())
}
