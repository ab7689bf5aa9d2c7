//! SQL query constants
//!
//! Centralizes the statements run against the `scheduler` table so the column
//! list stays in one place.

// ============================================================================
// Schema
// ============================================================================

pub const CREATE_SCHEDULER_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS scheduler (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date CHAR(8) NOT NULL,
        title TEXT NOT NULL,
        comment TEXT NOT NULL DEFAULT '',
        repeat VARCHAR(128) NOT NULL DEFAULT '',
        UNIQUE(date, title),
        CHECK (length(date) = 8),
        CHECK (title != '')
    )
"#;

/// Secondary access path for due-date scans
pub const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_scheduler_date ON scheduler(date)";

// ============================================================================
// Task Queries
// ============================================================================

/// Column list matching the `Task` row model
pub const TASK_COLUMNS: &str = "id, date, title, comment, repeat";

pub const SELECT_TASKS: &str = const_format::formatcp!("SELECT {} FROM scheduler", TASK_COLUMNS);

pub const SELECT_TASK_BY_ID: &str =
    const_format::formatcp!("SELECT {} FROM scheduler WHERE id = ?", TASK_COLUMNS);

pub const INSERT_TASK: &str =
    "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?, ?, ?, ?)";

pub const UPDATE_TASK: &str =
    "UPDATE scheduler SET date = ?, title = ?, comment = ?, repeat = ? WHERE id = ?";

pub const UPDATE_TASK_DATE: &str = "UPDATE scheduler SET date = ? WHERE id = ?";

pub const DELETE_TASK: &str = "DELETE FROM scheduler WHERE id = ?";
