use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

/// 사용량 로그 한 건
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UsageLog {
    pub id: i64,
    pub timestamp: i64,
    pub user_id: String,
    pub model: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub duration_ms: i64,
}

/// 집계된 사용량
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_requests: i64,
    pub average_duration_ms: f64,
    pub tokens_used: i64,
    /// (model id, request count) in first-seen order
    pub by_model: Vec<(String, i64)>,
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn init(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        // 연결 풀 생성
        let pool = SqlitePool::connect_with(options).await?;
        Self::migrate(&pool).await?;

        tracing::info!("Database ready at {:?}", db_path);
        Ok(Self { pool })
    }

    /// In-memory database. A single connection keeps every query on the same
    /// memory instance.
    pub async fn init_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        // 테이블 생성
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                model TEXT NOT NULL,
                prompt_tokens INTEGER NOT NULL,
                completion_tokens INTEGER NOT NULL,
                duration_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // 초기 설정값
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO config (key, value) VALUES
                ('last_model', 'gpt-4o')
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn log_usage(
        &self,
        user_id: &str,
        model: &str,
        prompt_tokens: i64,
        completion_tokens: i64,
        duration_ms: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_logs (timestamp, user_id, model, prompt_tokens, completion_tokens, duration_ms)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chrono::Utc::now().timestamp())
        .bind(user_id)
        .bind(model)
        .bind(prompt_tokens)
        .bind(completion_tokens)
        .bind(duration_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_recent_usage(&self, limit: i64) -> Result<Vec<UsageLog>> {
        let logs = sqlx::query_as::<_, UsageLog>(
            r#"
            SELECT id, timestamp, user_id, model, prompt_tokens, completion_tokens, duration_ms
            FROM usage_logs ORDER BY id DESC LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn get_usage_summary(&self) -> Result<UsageSummary> {
        let (total_requests, average_duration_ms, tokens_used) =
            sqlx::query_as::<_, (i64, f64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COALESCE(AVG(duration_ms), 0.0),
                    COALESCE(SUM(prompt_tokens + completion_tokens), 0)
                FROM usage_logs
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let by_model = sqlx::query_as::<_, (String, i64)>(
            "SELECT model, COUNT(*) FROM usage_logs GROUP BY model ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(UsageSummary {
            total_requests,
            average_duration_ms,
            tokens_used,
            by_model,
        })
    }

    pub async fn clear_usage_logs(&self) -> Result<()> {
        sqlx::query("DELETE FROM usage_logs")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set_config(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO config (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_last_model(&self) -> Result<Option<String>> {
        self.get_config("last_model").await
    }

    pub async fn set_last_model(&self, model: &str) -> Result<()> {
        self.set_config("last_model", model).await
    }
}
