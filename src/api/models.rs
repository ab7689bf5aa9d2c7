use crate::db::models::Task;
use crate::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};

/// Add task request
#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub repeat: Option<String>,
}

/// Add task response
#[derive(Debug, Serialize, Deserialize)]
pub struct AddTaskResponse {
    pub id: String,
}

/// Update task request, every field is replaced
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

/// Task id as sent by clients: normally a string, a bare number is accepted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// Query parameters carrying a task id
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: Option<String>,
}

/// Query parameters for the next date calculator
#[derive(Debug, Deserialize)]
pub struct NextDateQuery {
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub repeat: Option<String>,
}

/// Parse a task id coming from a query string or request body
pub fn parse_task_id(raw: Option<&str>) -> Result<i64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(SchedulerError::InvalidInput("Task id is required".to_string()));
    }

    raw.parse::<i64>()
        .map_err(|_| SchedulerError::InvalidInput(format!("Invalid task id '{}'", raw)))
}

impl RawId {
    pub fn to_task_id(&self) -> Result<i64> {
        match self {
            RawId::Text(text) => parse_task_id(Some(text)),
            RawId::Number(id) => Ok(*id),
        }
    }
}
