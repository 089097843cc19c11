use crate::{HistoryRecord, HistoryStore, InsertRequest, UpdateStatusRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dtk_core::{DtkError, Result, TaskStatus};
use sqlx::{Row, sqlite::SqlitePool, sqlite::SqliteRow};

/// SQLite-backed history store.
pub struct DatabaseHistoryStore {
    pool: SqlitePool,
}

impl DatabaseHistoryStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| DtkError::History(format!("database connection failed: {}", e)))?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS file_translation_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                task_id TEXT NOT NULL UNIQUE,
                task_name TEXT NOT NULL,
                date_time TEXT NOT NULL,
                source_file_name TEXT NOT NULL,
                source_file_path TEXT NOT NULL,
                translated_file_name TEXT,
                translated_file_path TEXT,
                status TEXT NOT NULL,
                duration REAL NOT NULL DEFAULT 0.0,
                error TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DtkError::History(format!("migration failed: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_file_translation_history_user_id
             ON file_translation_history (user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DtkError::History(format!("migration failed: {}", e)))?;

        Ok(())
    }

    fn row_to_record(row: &SqliteRow) -> Result<HistoryRecord> {
        let date_time: String = row.get("date_time");
        let date_time = DateTime::parse_from_rfc3339(&date_time)
            .map_err(|e| DtkError::History(format!("parse date failed: {}", e)))?
            .with_timezone(&Utc);

        let status: String = row.get("status");
        let status = TaskStatus::parse(&status)
            .ok_or_else(|| DtkError::History(format!("unknown status: {}", status)))?;

        Ok(HistoryRecord {
            id: row.get("id"),
            user_id: row.get("user_id"),
            task_id: row.get("task_id"),
            task_name: row.get("task_name"),
            date_time,
            source_file_name: row.get("source_file_name"),
            source_file_path: row.get("source_file_path"),
            translated_file_name: row.get("translated_file_name"),
            translated_file_path: row.get("translated_file_path"),
            status,
            duration: row.get("duration"),
            error: row.get("error"),
        })
    }
}

#[async_trait]
impl HistoryStore for DatabaseHistoryStore {
    async fn insert(&self, req: InsertRequest) -> Result<HistoryRecord> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO file_translation_history
                (user_id, task_id, task_name, date_time, source_file_name, source_file_path,
                 translated_file_name, translated_file_path, status, duration, error)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.user_id)
        .bind(&req.task_id)
        .bind(&req.task_name)
        .bind(now.to_rfc3339())
        .bind(&req.source_file_name)
        .bind(&req.source_file_path)
        .bind(&req.translated_file_name)
        .bind(&req.translated_file_path)
        .bind(req.status.as_str())
        .bind(req.duration)
        .bind(&req.error)
        .execute(&self.pool)
        .await
        .map_err(|e| DtkError::History(format!("insert failed: {}", e)))?;

        Ok(HistoryRecord {
            id: result.last_insert_rowid(),
            user_id: req.user_id,
            task_id: req.task_id,
            task_name: req.task_name,
            date_time: now,
            source_file_name: req.source_file_name,
            source_file_path: req.source_file_path,
            translated_file_name: req.translated_file_name,
            translated_file_path: req.translated_file_path,
            status: req.status,
            duration: req.duration,
            error: req.error,
        })
    }

    async fn update_status(
        &self,
        task_id: &str,
        req: UpdateStatusRequest,
    ) -> Result<Option<HistoryRecord>> {
        let Some(mut record) = self.get_by_task_id(task_id).await? else {
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

        sqlx::query(
            r#"
            UPDATE file_translation_history
            SET status = ?, translated_file_name = ?, translated_file_path = ?,
                duration = ?, error = ?
            WHERE task_id = ?
            "#,
        )
        .bind(record.status.as_str())
        .bind(&record.translated_file_name)
        .bind(&record.translated_file_path)
        .bind(record.duration)
        .bind(&record.error)
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DtkError::History(format!("update failed: {}", e)))?;

        Ok(Some(record))
    }

    async fn get_by_task_id(&self, task_id: &str) -> Result<Option<HistoryRecord>> {
        let row = sqlx::query("SELECT * FROM file_translation_history WHERE task_id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DtkError::History(format!("query failed: {}", e)))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM file_translation_history WHERE user_id = ?
             ORDER BY date_time DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DtkError::History(format!("query failed: {}", e)))?;

        rows.iter().map(Self::row_to_record).collect()
    }
}
