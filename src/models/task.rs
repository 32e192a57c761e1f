use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most recent completed tasks shown on the board.
pub const COMPLETED_PREVIEW: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub effort_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct NewTask<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort_score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TaskCompletionPatch {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskCompletionPatch {
    /// Flip a task's state; completing stamps the time, reopening clears it.
    pub fn toggle(task: &Task, now: DateTime<Utc>) -> Self {
        let completed = !task.completed;
        Self {
            completed,
            completed_at: completed.then_some(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskBoard {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskBoard {
    /// Split on the completed flag, keeping the incoming order in both lists.
    pub fn partition(tasks: Vec<Task>) -> Self {
        let (completed, pending): (Vec<Task>, Vec<Task>) =
            tasks.into_iter().partition(|t| t.completed);
        Self {
            pending,
            completed: completed.into_iter().take(COMPLETED_PREVIEW).collect(),
        }
    }
}
