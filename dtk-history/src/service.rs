use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dtk_core::{Result, TaskStatus};
use serde::{Deserialize, Serialize};

/// One durable row per translation task. Unlike the status cache, rows
/// survive cache eviction and back the history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub user_id: String,
    pub task_id: String,
    pub task_name: String,
    pub date_time: DateTime<Utc>,
    pub source_file_name: String,
    pub source_file_path: String,
    pub translated_file_name: Option<String>,
    pub translated_file_path: Option<String>,
    pub status: TaskStatus,
    pub duration: f64,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsertRequest {
    pub user_id: String,
    pub task_id: String,
    pub task_name: String,
    pub source_file_name: String,
    pub source_file_path: String,
    pub translated_file_name: Option<String>,
    pub translated_file_path: Option<String>,
    pub status: TaskStatus,
    pub duration: f64,
    pub error: Option<String>,
}

/// Patch applied to an existing row; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateStatusRequest {
    pub status: Option<TaskStatus>,
    pub translated_file_name: Option<String>,
    pub translated_file_path: Option<String>,
    pub duration: Option<f64>,
    pub error: Option<String>,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, req: InsertRequest) -> Result<HistoryRecord>;

    async fn update_status(
        &self,
        task_id: &str,
        req: UpdateStatusRequest,
    ) -> Result<Option<HistoryRecord>>;

    async fn get_by_task_id(&self, task_id: &str) -> Result<Option<HistoryRecord>>;

    /// All records for a user, newest first.
    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<HistoryRecord>>;
}
