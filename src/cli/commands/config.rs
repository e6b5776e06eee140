use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};
use std::process::Command;

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &std::path::Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if *print_config {
        // roster password and account hashes stay out of the terminal
        let mut shown = cfg.clone();
        if !shown.roster.password.is_empty() {
            shown.roster.password = "********".to_string();
        }
        for hash in shown.accounts.values_mut() {
            *hash = "********".to_string();
        }

        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", serde_yaml::to_string(&shown)?);
    }

    if *edit_config {
        let fallback = default_editor();
        let wanted = editor.clone().unwrap_or_else(|| fallback.clone());

        if run_editor(&wanted, &path) {
            success(format!("Configuration file edited using '{wanted}'"));
        } else if wanted != fallback {
            warning(format!(
                "Editor '{wanted}' not available, falling back to '{fallback}'"
            ));
            if run_editor(&fallback, &path) {
                success(format!("Configuration file edited using fallback '{fallback}'"));
            } else {
                error(format!("Failed to edit configuration file using '{fallback}'"));
            }
        } else {
            error(format!("Failed to edit configuration file using '{wanted}'"));
        }
    }

    Ok(())
}
