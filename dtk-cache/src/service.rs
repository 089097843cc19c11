use async_trait::async_trait;
use dtk_core::{Result, TranslationTask};
use std::collections::HashMap;

pub const STATUS_CACHE_NAMESPACE: &str = "file:translation:status";

/// Hash key holding all of a user's task snapshots. Fields are task ids,
/// values the JSON-serialized task.
pub fn status_cache_key(user_id: &str) -> String {
    format!("{}:{}", STATUS_CACHE_NAMESPACE, user_id)
}

/// Shared store of in-flight task snapshots, partitioned by user.
///
/// Writes are whole-value replacements under the single-writer-per-task
/// invariant, so last-writer-wins consistency is sufficient. The cache is
/// the source of truth across reads; no process-local task registry exists.
#[async_trait]
pub trait StatusCache: Send + Sync {
    async fn exists(&self, user_id: &str, task_id: &str) -> Result<bool>;

    async fn get(&self, user_id: &str, task_id: &str) -> Result<Option<TranslationTask>>;

    async fn get_all(&self, user_id: &str) -> Result<HashMap<String, TranslationTask>>;

    async fn set(&self, user_id: &str, task: &TranslationTask) -> Result<()>;

    async fn delete(&self, user_id: &str, task_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_layout() {
        assert_eq!(
            status_cache_key("alice@example.com"),
            "file:translation:status:alice@example.com"
        );
    }
}
