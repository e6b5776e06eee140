use crate::config::Config;
use crate::core::audit::AuditLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    AuditLogic::print_audit(&pool)
}
