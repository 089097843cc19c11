use crate::{StatusCache, status_cache_key};
use async_trait::async_trait;
use dtk_core::{Result, TranslationTask};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-process status cache for tests and single-instance deployments.
///
/// Entries are stored as serialized JSON under the same key layout as the
/// Redis backend so both observe identical snapshot semantics.
pub struct InMemoryStatusCache {
    entries: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl InMemoryStatusCache {
    pub fn new() -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl Default for InMemoryStatusCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusCache for InMemoryStatusCache {
    async fn exists(&self, user_id: &str, task_id: &str) -> Result<bool> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .get(&status_cache_key(user_id))
            .is_some_and(|fields| fields.contains_key(task_id)))
    }

    async fn get(&self, user_id: &str, task_id: &str) -> Result<Option<TranslationTask>> {
        let data = {
            let entries = self.entries.read().unwrap();
            entries.get(&status_cache_key(user_id)).and_then(|fields| fields.get(task_id).cloned())
        };
        data.map(|json| TranslationTask::from_json(&json)).transpose()
    }

    async fn get_all(&self, user_id: &str) -> Result<HashMap<String, TranslationTask>> {
        let fields = {
            let entries = self.entries.read().unwrap();
            entries.get(&status_cache_key(user_id)).cloned().unwrap_or_default()
        };

        let mut tasks = HashMap::with_capacity(fields.len());
        for (task_id, json) in fields {
            tasks.insert(task_id, TranslationTask::from_json(&json)?);
        }
        Ok(tasks)
    }

    async fn set(&self, user_id: &str, task: &TranslationTask) -> Result<()> {
        let json = task.to_json()?;
        let mut entries = self.entries.write().unwrap();
        entries
            .entry(status_cache_key(user_id))
            .or_default()
            .insert(task.task_id.clone(), json);
        Ok(())
    }

    async fn delete(&self, user_id: &str, task_id: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        if let Some(fields) = entries.get_mut(&status_cache_key(user_id)) {
            fields.remove(task_id);
        }
        Ok(())
    }
}
