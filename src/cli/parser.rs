use crate::export::ExportFormat;
use crate::models::scan_mode::ScanMode;
use clap::{Parser, Subcommand};

/// Command-line interface for rattendance:
/// barcode-based attendance logging for school classes, backed by SQLite.
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Barcode attendance logbook: register students, scan check-ins/outs and export the daily log",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Operator user name
    #[arg(global = true, long = "user", short = 'u', env = "RATTENDANCE_USER")]
    pub user: Option<String>,

    /// Operator password
    #[arg(
        global = true,
        long = "password",
        env = "RATTENDANCE_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init {
        /// Password of the `admin` account written to the config
        #[arg(long = "admin-password", default_value = "flb23")]
        admin_password: String,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(long = "editor", requires = "edit_config")]
        editor: Option<String>,
    },

    /// Database maintenance
    Db {
        #[arg(long = "migrate", help = "Bring the schema up to date")]
        migrate: bool,

        #[arg(long = "check", help = "Run PRAGMA integrity_check")]
        check: bool,

        #[arg(long = "vacuum", help = "Compact the database file")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database statistics")]
        info: bool,
    },

    /// Register a student under a barcode
    Add {
        /// Barcode ID printed on the student card
        barcode: String,
        /// Display name
        name: String,
    },

    /// Change the display name of a registered student
    Rename {
        barcode: String,
        name: String,
    },

    /// Delete a student (logged events are kept)
    Del {
        barcode: String,
    },

    /// List registered students
    Students,

    /// Scan one card and log the event
    Scan {
        /// Check-in or check-out
        #[arg(long = "mode", short = 'm', value_enum, default_value_t = ScanMode::CheckIn)]
        mode: ScanMode,

        /// Free-text action overriding the mode label
        #[arg(long = "action")]
        action: Option<String>,

        /// Scanned code(s), one symbol each
        #[arg(long = "code", short = 'c', conflicts_with = "input")]
        codes: Vec<String>,

        /// Read the scanner output from a file instead of stdin
        #[arg(long = "input", short = 'i')]
        input: Option<String>,
    },

    /// Show the log of one day
    Log {
        /// Date (YYYY-MM-DD), default today
        #[arg(long = "date", short = 'd')]
        date: Option<String>,
    },

    /// Export the log of one day
    Export {
        /// Date (YYYY-MM-DD), default today
        #[arg(long = "date", short = 'd')]
        date: Option<String>,

        #[arg(long = "format", short = 'f', value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file, default `logbuch_<date>.<ext>`
        #[arg(long = "file")]
        file: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(long = "force")]
        force: bool,
    },

    /// WebUntis roster import and barcode mappings
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Print the audit trail
    Audit,

    /// Back up the database file
    Backup {
        #[arg(long = "file", help = "Destination file")]
        file: String,

        #[arg(long = "compress", help = "Store the copy as a zip archive")]
        compress: bool,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// List classes
    Classes {
        /// Bypass the roster cache
        #[arg(long = "refresh")]
        refresh: bool,
    },

    /// List students, optionally of one class
    Students {
        #[arg(long = "class", short = 'k')]
        class: Option<String>,

        #[arg(long = "refresh")]
        refresh: bool,
    },

    /// Map a barcode to a student (creates or updates the registry entry)
    Map {
        barcode: String,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "class", short = 'k')]
        class: Option<String>,

        /// WebUntis student id; name and class are taken from the roster when omitted
        #[arg(long = "roster-id")]
        roster_id: Option<String>,
    },

    /// List registered students with class and roster id
    Mappings,

    /// Remove a mapping
    Unmap {
        barcode: String,
    },
}

impl Commands {
    /// Commands usable without logging in.
    pub fn needs_login(&self) -> bool {
        !matches!(self, Commands::Init { .. } | Commands::Config { .. })
    }
}
