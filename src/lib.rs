pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod nextdate;
pub mod sql_constants;
pub mod tasks;
pub mod time_utils;

#[cfg(test)]
pub mod test_utils;
