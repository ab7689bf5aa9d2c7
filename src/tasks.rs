use crate::db::models::{NewTask, Task};
use crate::error::{Result, SchedulerError};
use crate::nextdate::{next_date, next_date_lenient, RepeatContext, RepeatRule};
use crate::sql_constants::{
    DELETE_TASK, INSERT_TASK, SELECT_TASKS, SELECT_TASK_BY_ID, UPDATE_TASK, UPDATE_TASK_DATE,
};
use crate::time_utils::{format_date, parse_date};
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Maximum number of tasks returned by a listing
pub const LIST_LIMIT: usize = 50;

/// What completing a task did to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// One-shot task, the row is gone
    Deleted,
    /// Recurring task, moved to the contained `YYYYMMDD` date
    Rescheduled(String),
}

pub struct TaskStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new task and return its id
    ///
    /// The caller is expected to have normalized the task with
    /// [`prepare_new_task`]; the store only enforces `(date, title)` uniqueness.
    pub async fn add_task(&self, task: &NewTask) -> Result<i64> {
        let result = sqlx::query(INSERT_TASK)
            .bind(&task.date)
            .bind(&task.title)
            .bind(&task.comment)
            .bind(&task.repeat)
            .execute(self.pool)
            .await
            .map_err(|e| map_write_error(e, &task.date, &task.title))?;

        let id = result.last_insert_rowid();
        crate::log_task_operation!("add", id, task.date.as_str());

        Ok(id)
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i64) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(SELECT_TASK_BY_ID)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(SchedulerError::TaskNotFound(id))?;

        Ok(task)
    }

    /// Overwrite every field of an existing task
    ///
    /// The repeat rule is validated first, including a strict `check` probe of
    /// the evaluator against the task's date and `today`.
    pub async fn update_task(&self, task: &Task, today: NaiveDate) -> Result<()> {
        if task.title.trim().is_empty() {
            return Err(SchedulerError::InvalidInput(
                "Task title must not be empty".to_string(),
            ));
        }
        parse_date(&task.date)?;
        RepeatRule::parse(&task.repeat)?;
        next_date(today, &task.date, &task.repeat, RepeatContext::Check)?;

        let result = sqlx::query(UPDATE_TASK)
            .bind(&task.date)
            .bind(&task.title)
            .bind(&task.comment)
            .bind(&task.repeat)
            .bind(task.id)
            .execute(self.pool)
            .await
            .map_err(|e| map_write_error(e, &task.date, &task.title))?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::TaskNotFound(task.id));
        }

        crate::log_task_operation!("update", task.id, task.date.as_str());

        Ok(())
    }

    /// Delete a task
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let result = sqlx::query(DELETE_TASK)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::TaskNotFound(id));
        }

        crate::log_task_operation!("delete", id);

        Ok(())
    }

    /// List tasks by effective date, at most [`LIST_LIMIT`] of them
    ///
    /// Tasks due on or before `today` are reported with their next occurrence
    /// as computed by the lenient evaluator. This is a view: stored rows are
    /// never modified. When the evaluator has no date to offer (one-shot task,
    /// broken rule) the stored date is kept.
    pub async fn list_upcoming(&self, today: NaiveDate) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(SELECT_TASKS)
            .fetch_all(self.pool)
            .await?;

        let mut listed: Vec<(NaiveDate, Task)> = Vec::with_capacity(rows.len());

        for mut task in rows {
            let stored = match parse_date(&task.date) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!(task_id = task.id, error = %e, "Skipping task with corrupt date");
                    continue;
                },
            };

            let effective = if stored <= today {
                next_date_lenient(today, &task.date, &task.repeat, RepeatContext::List)
                    .unwrap_or(stored)
            } else {
                stored
            };

            task.date = format_date(effective);
            listed.push((effective, task));
        }

        listed.sort_by(|(a_date, a), (b_date, b)| a_date.cmp(b_date).then(a.id.cmp(&b.id)));
        listed.truncate(LIST_LIMIT);

        Ok(listed.into_iter().map(|(_, task)| task).collect())
    }

    /// Mark a task as done
    ///
    /// One-shot tasks are deleted; recurring tasks are moved to the next
    /// occurrence computed in the `done` context.
    pub async fn complete_task(&self, id: i64, today: NaiveDate) -> Result<Completion> {
        let task = self.get_task(id).await?;

        if !task.is_recurring() {
            self.delete_task(id).await?;
            return Ok(Completion::Deleted);
        }

        let next = next_date(today, &task.date, &task.repeat, RepeatContext::Done)?
            .map(format_date)
            .ok_or_else(|| {
                SchedulerError::InvalidInput(format!(
                    "Task {} has repeat rule '{}' with no next occurrence",
                    id, task.repeat
                ))
            })?;

        let result = sqlx::query(UPDATE_TASK_DATE)
            .bind(&next)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| map_write_error(e, &next, &task.title))?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::TaskNotFound(id));
        }

        crate::log_task_operation!("done", id, next.as_str());

        Ok(Completion::Rescheduled(next))
    }
}

/// Validate and normalize the fields of an add request
///
/// - a blank `date` means `today`
/// - `title` is trimmed and must not be empty
/// - `repeat` must follow the rule grammar
/// - a date before `today` moves to `today` (no repeat) or to the next
///   occurrence in the `add` context
pub fn prepare_new_task(
    date: Option<&str>,
    title: &str,
    comment: Option<&str>,
    repeat: Option<&str>,
    today: NaiveDate,
) -> Result<NewTask> {
    let title = title.trim();
    if title.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "Task title must not be empty".to_string(),
        ));
    }

    let repeat = repeat.unwrap_or_default();
    let rule = RepeatRule::parse(repeat)?;

    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => today,
    };

    let date = if date >= today {
        date
    } else if rule == RepeatRule::Never {
        today
    } else {
        next_date(today, &format_date(date), repeat, RepeatContext::Add)?.ok_or_else(|| {
            SchedulerError::InvalidInput(format!("Repeat rule '{}' yields no date", repeat))
        })?
    };

    Ok(NewTask {
        date: format_date(date),
        title: title.to_string(),
        comment: comment.unwrap_or_default().to_string(),
        repeat: repeat.to_string(),
    })
}

fn map_write_error(e: sqlx::Error, date: &str, title: &str) -> SchedulerError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            SchedulerError::DuplicateTask {
                date: date.to_string(),
                title: title.to_string(),
            }
        },
        _ => SchedulerError::DatabaseError(e),
    }
}
