use crate::config::Config;
use clap::ValueEnum;
use serde::Serialize;

/// Operator-selected scan mode. The stored action is a free-text label;
/// this enum only picks which configured label to use.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    #[value(name = "in", alias = "check-in")]
    CheckIn,
    #[value(name = "out", alias = "check-out")]
    CheckOut,
}

impl ScanMode {
    pub fn label<'a>(&self, cfg: &'a Config) -> &'a str {
        match self {
            ScanMode::CheckIn => &cfg.check_in_label,
            ScanMode::CheckOut => &cfg.check_out_label,
        }
    }
}
