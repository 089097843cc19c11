use crate::{HistoryRecord, HistoryStore, InsertRequest, UpdateStatusRequest};
use async_trait::async_trait;
use chrono::Utc;
use dtk_core::{DtkError, Result};
use std::sync::{Arc, RwLock};

/// In-process history store for tests and single-instance deployments.
pub struct InMemoryHistoryStore {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
    next_id: Arc<RwLock<i64>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self { records: Arc::new(RwLock::new(Vec::new())), next_id: Arc::new(RwLock::new(1)) }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn insert(&self, req: InsertRequest) -> Result<HistoryRecord> {
        let mut records = self.records.write().unwrap();
        if records.iter().any(|r| r.task_id == req.task_id) {
            return Err(DtkError::History(format!(
                "history record already exists for task {}",
                req.task_id
            )));
        }

        let id = {
            let mut next_id = self.next_id.write().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let record = HistoryRecord {
            id,
            user_id: req.user_id,
            task_id: req.task_id,
            task_name: req.task_name,
            date_time: Utc::now(),
            source_file_name: req.source_file_name,
            source_file_path: req.source_file_path,
            translated_file_name: req.translated_file_name,
            translated_file_path: req.translated_file_path,
            status: req.status,
            duration: req.duration,
            error: req.error,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        task_id: &str,
        req: UpdateStatusRequest,
    ) -> Result<Option<HistoryRecord>> {
        let mut records = self.records.write().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.task_id == task_id) else {
            return Ok(None);
        };

        if let Some(status) = req.status {
            record.status = status;
        }
        if let Some(name) = req.translated_file_name {
            record.translated_file_name = Some(name);
        }
        if let Some(path) = req.translated_file_path {
            record.translated_file_path = Some(path);
        }
        if let Some(duration) = req.duration {
            record.duration = duration;
        }
        if let Some(error) = req.error {
            record.error = Some(error);
        }
        Ok(Some(record.clone()))
    }

    async fn get_by_task_id(&self, task_id: &str) -> Result<Option<HistoryRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|r| r.task_id == task_id).cloned())
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<HistoryRecord>> {
        let records = self.records.read().unwrap();
        let mut rows: Vec<HistoryRecord> =
            records.iter().filter(|r| r.user_id == user_id).cloned().collect();
        rows.sort_by(|a, b| b.date_time.cmp(&a.date_time).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
