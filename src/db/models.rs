use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// A persisted task row
///
/// `date` is kept in its persisted `YYYYMMDD` form; it is the task's currently
/// scheduled occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Task {
    #[serde(serialize_with = "id_as_string")]
    pub id: i64,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Fields of a task that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

fn id_as_string<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_string())
}
