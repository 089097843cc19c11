use dtk_cache::{InMemoryStatusCache, StatusCache};
use dtk_core::{TaskStatus, TranslationTask};

fn task(task_id: &str) -> TranslationTask {
    TranslationTask::new(task_id, "英➡︎日", format!("/tmp/{task_id}"))
}

#[tokio::test]
async fn test_set_then_exists_and_get() {
    let cache = InMemoryStatusCache::new();
    let task = task("1700000000_deck.pptx");

    assert!(!cache.exists("alice", &task.task_id).await.unwrap());

    cache.set("alice", &task).await.unwrap();

    assert!(cache.exists("alice", &task.task_id).await.unwrap());
    let loaded = cache.get("alice", &task.task_id).await.unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[tokio::test]
async fn test_users_are_partitioned() {
    let cache = InMemoryStatusCache::new();
    cache.set("alice", &task("1_a.pptx")).await.unwrap();
    cache.set("bob", &task("2_b.pptx")).await.unwrap();

    assert!(!cache.exists("alice", "2_b.pptx").await.unwrap());
    assert_eq!(cache.get_all("alice").await.unwrap().len(), 1);
    assert_eq!(cache.get_all("bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_is_whole_value_replacement() {
    let cache = InMemoryStatusCache::new();
    let mut task = task("1_deck.pptx");
    cache.set("alice", &task).await.unwrap();

    task.status = TaskStatus::Completed;
    task.progress = 1.0;
    task.output_file_path = Some("/tmp/translated/out.pptx".to_string());
    task.duration = Some(1.25);
    cache.set("alice", &task).await.unwrap();

    let loaded = cache.get("alice", &task.task_id).await.unwrap().unwrap();
    assert_eq!(loaded.status, TaskStatus::Completed);
    assert_eq!(loaded.progress, 1.0);
    assert_eq!(loaded.output_file_path.as_deref(), Some("/tmp/translated/out.pptx"));
}

#[tokio::test]
async fn test_delete_removes_only_that_task() {
    let cache = InMemoryStatusCache::new();
    cache.set("alice", &task("1_a.pptx")).await.unwrap();
    cache.set("alice", &task("2_b.pptx")).await.unwrap();

    cache.delete("alice", "1_a.pptx").await.unwrap();

    assert!(!cache.exists("alice", "1_a.pptx").await.unwrap());
    assert!(cache.exists("alice", "2_b.pptx").await.unwrap());
}

#[tokio::test]
async fn test_get_all_empty_user() {
    let cache = InMemoryStatusCache::new();
    assert!(cache.get_all("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_task_is_none() {
    let cache = InMemoryStatusCache::new();
    assert!(cache.get("alice", "missing").await.unwrap().is_none());
}
