use crate::Result;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Stream of task snapshots produced by a format handler. `Err` items are
/// fatal (document unusable); per-slide failures stay on the snapshot's
/// `error` field instead.
pub type TaskStream = Pin<Box<dyn Stream<Item = Result<TranslationTask>> + Send>>;

/// Infallible stream of task snapshots as observed by API consumers: the
/// driver has already folded fatal errors into a terminal ERROR snapshot.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = TranslationTask> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Processing,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
        }
    }

    /// Inverse of [`TaskStatus::as_str`], for stores that persist the
    /// status as a plain string column.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PROCESSING" => Some(Self::Processing),
            "COMPLETED" => Some(Self::Completed),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission's mutable state record.
///
/// The executing job is the single writer; everyone else observes
/// whole-value JSON snapshots through the status cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationTask {
    pub task_id: String,
    pub task_name: String,
    pub input_file_path: String,
    #[serde(default)]
    pub output_file_path: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranslationTask {
    pub fn new(
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        input_file_path: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            task_name: task_name.into(),
            input_file_path: input_file_path.into(),
            output_file_path: None,
            status: TaskStatus::Processing,
            progress: 0.0,
            duration: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}
