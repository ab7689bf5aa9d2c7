use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Todo Scheduler - personal task scheduler with recurring tasks

Repeat rules:
  (empty)   one-shot task, removed when marked done
  d <N>     every N days, 1 <= N <= 400
  y         every year on the same day (Feb 29 moves to Mar 1)

Dates are always written as YYYYMMDD.

Environment:
  TODO_PORT, TODO_DBFILE, TODO_WEBDIR and TODO_HOST provide defaults for the
  matching `serve` options. RUST_LOG overrides the log filter.
"#;

#[derive(Parser, Clone, Debug)]
#[command(name = "scheduler")]
#[command(about = "Personal task scheduler with recurring tasks and a JSON API")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, global = true, env = "TODO_LOGFILE")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub server: ServeArgs,

    /// Command to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run the HTTP server (API and static web files)
    Serve,

    /// Compute the next occurrence of a task without touching the database
    ///
    /// Examples:
    ///   scheduler next-date --now 20240126 --date 20240125 --repeat "d 7"
    ///   scheduler next-date --now 20250301 --date 20240229 --repeat y --context done
    NextDate {
        /// Reference date (YYYYMMDD), defaults to today
        #[arg(long)]
        now: Option<String>,

        /// Stored task date (YYYYMMDD)
        #[arg(long)]
        date: String,

        /// Repeat rule: "", "d <N>" or "y"
        #[arg(long, default_value = "")]
        repeat: String,

        /// Calling context: list, add, check, done or nextdate
        #[arg(long, default_value = "nextdate")]
        context: String,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, global = true, env = "TODO_PORT", default_value_t = crate::config::DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, global = true, env = "TODO_HOST", default_value = crate::config::DEFAULT_HOST)]
    pub host: String,

    /// SQLite database file, created on first start
    #[arg(long, global = true, env = "TODO_DBFILE", default_value = crate::config::DEFAULT_DB_FILE)]
    pub db_file: PathBuf,

    /// Directory with the static web front-end
    #[arg(long, global = true, env = "TODO_WEBDIR", default_value = crate::config::DEFAULT_WEB_DIR)]
    pub web_dir: PathBuf,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: crate::config::DEFAULT_PORT,
            host: crate::config::DEFAULT_HOST.to_string(),
            db_file: PathBuf::from(crate::config::DEFAULT_DB_FILE),
            web_dir: PathBuf::from(crate::config::DEFAULT_WEB_DIR),
        }
    }
}
