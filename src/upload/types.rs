use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A video the user picked, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: &'static str,
}

/// Opaque id of a backend processing task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One generated clip, as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortResult {
    pub filename: String,
    /// Relevance in `0.0..=1.0`.
    pub score: f64,
    /// Seconds.
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
}

/// Last known state of a task (`GET /api/task/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub shorts: Option<Vec<ShortResult>>,
}

impl TaskSnapshot {
    pub fn shorts(&self) -> &[ShortResult] {
        self.shorts.as_deref().unwrap_or_default()
    }

    /// Progress clamped to `0.0..=1.0` for a progress bar.
    pub fn progress_fraction(&self) -> f32 {
        (self.progress / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub task_id: TaskId,
}
