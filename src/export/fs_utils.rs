// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Checks that `path` may be created or replaced.
///
/// - missing file → Ok
/// - existing file with `force` → Ok
/// - existing file without `force` → ask on stdin
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("Die Datei '{}' existiert bereits.", path.display()));

    print!("Überschreiben? [j/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if matches!(ans.as_str(), "j" | "ja" | "y" | "yes") {
        info("Bestehende Datei wird überschrieben.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "export cancelled: '{}' not overwritten",
            path.display()
        )))
    }
}

/// Write `bytes` to `path`, creating parent directories.
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_forced_targets_are_writable() {
        let dir = std::env::temp_dir().join("rattendance_fs_utils");
        let target = dir.join("nested").join("out.csv");
        fs::remove_dir_all(&dir).ok();

        ensure_writable(&target, false).unwrap();
        write_output(&target, b"x").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"x");

        ensure_writable(&target, true).unwrap();
        fs::remove_dir_all(&dir).ok();
    }
}
