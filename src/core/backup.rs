use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ensure_writable;
use crate::session::Session;
use crate::ui::messages::{success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally as a zip archive.
    /// Returns the path actually written.
    pub fn backup(
        pool: &DbPool,
        session: &Session,
        db_path: &str,
        dest_file: &str,
        compress: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!(
                "database file {}",
                src.display()
            )));
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        ensure_writable(dest, false)?;

        fs::copy(src, dest)?;
        success(format!("Backup erstellt: {}", dest.display()));

        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Unkomprimierte Kopie nicht entfernt: {e}"));
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        audit::record(
            &pool.conn,
            session,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Wrap `path` into `<path>.zip` (deflated).
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rattendance.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    success(format!("Komprimiert: {}", zip_path.display()));
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Registry;
    use chrono::Local;

    fn session() -> Session {
        Session {
            operator: "admin".into(),
            started_at: Local::now(),
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rattendance_backup_{name}"));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn plain_backup_copies_and_audits() {
        let dir = scratch("plain");
        let db = dir.join("src.sqlite");
        let pool = DbPool::new(db.to_str().unwrap()).unwrap();
        Registry::new(&pool.conn).register("123", "Anna").unwrap();

        let out = dir.join("copy.sqlite");
        let written =
            BackupLogic::backup(&pool, &session(), db.to_str().unwrap(), out.to_str().unwrap(), false)
                .unwrap();
        assert_eq!(written, out);

        let copy = DbPool::new(out.to_str().unwrap()).unwrap();
        assert_eq!(Registry::new(&copy.conn).lookup("123").unwrap().as_deref(), Some("Anna"));

        let entries = audit::load_all(&pool.conn).unwrap();
        assert_eq!(entries.last().unwrap().operation, "backup");
    }

    #[test]
    fn compressed_backup_leaves_only_the_zip() {
        let dir = scratch("zip");
        let db = dir.join("src.sqlite");
        let pool = DbPool::new(db.to_str().unwrap()).unwrap();

        let out = dir.join("copy.sqlite");
        let written =
            BackupLogic::backup(&pool, &session(), db.to_str().unwrap(), out.to_str().unwrap(), true)
                .unwrap();
        assert_eq!(written, dir.join("copy.zip"));
        assert!(written.exists());
        assert!(!out.exists());
    }

    #[test]
    fn missing_database_is_not_found() {
        let dir = scratch("missing");
        let pool = DbPool::in_memory().unwrap();
        let err = BackupLogic::backup(
            &pool,
            &session(),
            dir.join("nope.sqlite").to_str().unwrap(),
            dir.join("out.sqlite").to_str().unwrap(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
