//! In-memory task list
//!
//! Append-only, process-lifetime storage. Order is insertion order; entries
//! are never merged or deduplicated.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Marker rendered in front of every open task
pub const OPEN_TASK_MARKER: &str = "⭕";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task text cannot be empty")]
    EmptyText,
}

/// Lifecycle status of a task. Only `Active` is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub text: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Task as shown to the user, e.g. `⭕ Buy milk`
    pub fn display(&self) -> String {
        format!("{OPEN_TASK_MARKER} {}", self.text)
    }
}

/// Exclusive owner of all task records
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new active task.
    ///
    /// The text is stored verbatim; whitespace-only text is rejected.
    pub fn add(&mut self, text: impl Into<String>) -> Result<&Task, TaskError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }
        self.tasks.push(Task {
            text,
            status: TaskStatus::Active,
            created_at: Utc::now(),
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Active tasks in insertion order (possibly empty)
    pub fn list_active(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Active)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
