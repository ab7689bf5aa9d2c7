use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Task '{title}' already exists on {date}")]
    DuplicateTask { date: String, title: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date '{0}': expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Unsupported repeat rule: '{0}'")]
    UnsupportedRule(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl SchedulerError {
    /// Client-caused failures that abort the request before any write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidInput(_)
                | SchedulerError::InvalidDate(_)
                | SchedulerError::UnsupportedRule(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            SchedulerError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            SchedulerError::DuplicateTask { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            SchedulerError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SchedulerError::UnsupportedRule("w 2".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SchedulerError::TaskNotFound(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchedulerError::DuplicateTask {
                date: "20240101".into(),
                title: "a".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SchedulerError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_client_errors_are_validation() {
        assert!(SchedulerError::InvalidDate("2024".into()).is_validation());
        assert!(SchedulerError::InvalidInput("x".into()).is_validation());
        assert!(SchedulerError::UnsupportedRule("w 2".into()).is_validation());
        assert!(!SchedulerError::TaskNotFound(1).is_validation());
        assert!(!SchedulerError::DatabaseError(sqlx::Error::PoolClosed).is_validation());
    }

    #[test]
    fn test_error_response_serialization() {
        let response = SchedulerError::TaskNotFound(42).to_error_response();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Task not found: 42" }));
    }
}
