use crate::{StatusCache, status_cache_key};
use async_trait::async_trait;
use dtk_core::{DtkError, Result, TranslationTask};
use fred::prelude::*;
use std::collections::HashMap;

fn cache_err(e: fred::error::Error) -> DtkError {
    DtkError::Cache(e.to_string())
}

/// Redis-backed status cache.
///
/// One hash per user (`file:translation:status:<user_id>`), fields keyed by
/// task id holding the JSON snapshot. Single-task access is O(1); listing a
/// user never scans other users' namespaces.
pub struct RedisStatusCache {
    client: Client,
}

impl RedisStatusCache {
    /// Connect to `url` (e.g. `redis://localhost:6379/0`) and wait for the
    /// connection to come up.
    pub async fn connect(url: &str) -> Result<Self> {
        let config = Config::from_url(url).map_err(cache_err)?;
        let client = Builder::from_config(config).build().map_err(cache_err)?;
        client.init().await.map_err(cache_err)?;
        Ok(Self { client })
    }

    /// Wrap an already-initialized client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusCache for RedisStatusCache {
    async fn exists(&self, user_id: &str, task_id: &str) -> Result<bool> {
        self.client.hexists(status_cache_key(user_id), task_id).await.map_err(cache_err)
    }

    async fn get(&self, user_id: &str, task_id: &str) -> Result<Option<TranslationTask>> {
        let data: Option<String> =
            self.client.hget(status_cache_key(user_id), task_id).await.map_err(cache_err)?;
        data.map(|json| TranslationTask::from_json(&json)).transpose()
    }

    async fn get_all(&self, user_id: &str) -> Result<HashMap<String, TranslationTask>> {
        let fields: HashMap<String, String> =
            self.client.hgetall(status_cache_key(user_id)).await.map_err(cache_err)?;

        let mut tasks = HashMap::with_capacity(fields.len());
        for (task_id, json) in fields {
            tasks.insert(task_id, TranslationTask::from_json(&json)?);
        }
        Ok(tasks)
    }

    async fn set(&self, user_id: &str, task: &TranslationTask) -> Result<()> {
        let json = task.to_json()?;
        let _: i64 = self
            .client
            .hset(status_cache_key(user_id), (task.task_id.as_str(), json))
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, task_id: &str) -> Result<()> {
        let _: i64 =
            self.client.hdel(status_cache_key(user_id), task_id).await.map_err(cache_err)?;
        Ok(())
    }
}
