//! Server configuration
//!
//! Resolved from the `serve` command line, where every option falls back to a
//! `TODO_*` environment variable and then to the defaults below.

use crate::cli::ServeArgs;
use crate::error::{Result, SchedulerError};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 7540;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_FILE: &str = "scheduler.db";
pub const DEFAULT_WEB_DIR: &str = "./web";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub web_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self> {
        if args.port == 0 {
            return Err(SchedulerError::InvalidInput(
                "Port must be between 1 and 65535".to_string(),
            ));
        }

        let ip: IpAddr = args.host.parse().map_err(|_| {
            SchedulerError::InvalidInput(format!("Invalid listen address '{}'", args.host))
        })?;

        if args.db_file.as_os_str().is_empty() {
            return Err(SchedulerError::InvalidInput(
                "Database file path must not be empty".to_string(),
            ));
        }

        Ok(Self {
            addr: SocketAddr::new(ip, args.port),
            db_path: args.db_file.clone(),
            web_dir: args.web_dir.clone(),
        })
    }
}
