// ==========================================
// 高校排课调度系统 - 通知仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 用途: 通知记录落库; 外部投递层 (邮件等) 只读消费
// ==========================================

use crate::domain::types::{NotificationAudience, NotificationSeverity};
use crate::domain::NotificationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// NotificationRepository - 通知仓储
// ==========================================
pub struct NotificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NotificationRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<NotificationRecord> {
        let audience_raw: String = row.get(3)?;
        let severity_raw: String = row.get(4)?;
        let metadata_raw: Option<String> = row.get(7)?;

        Ok(NotificationRecord {
            notification_id: row.get(0)?,
            title: row.get(1)?,
            message: row.get(2)?,
            audience: NotificationAudience::from_str(&audience_raw)
                .unwrap_or(NotificationAudience::All),
            severity: NotificationSeverity::from_str(&severity_raw)
                .unwrap_or(NotificationSeverity::Info),
            category: row.get(5)?,
            schedule_id: row.get(6)?,
            metadata: metadata_raw.and_then(|raw| serde_json::from_str(&raw).ok()),
            created_at: row.get(8)?,
        })
    }

    /// 插入通知记录, 返回完整记录
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &self,
        title: &str,
        message: &str,
        audience: NotificationAudience,
        severity: NotificationSeverity,
        category: &str,
        schedule_id: Option<i64>,
        metadata: Option<JsonValue>,
    ) -> RepositoryResult<NotificationRecord> {
        let conn = self.get_conn()?;
        let notification_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let metadata_raw = match &metadata {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "metadata".to_string(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        conn.execute(
            r#"
            INSERT INTO notification (
                notification_id, title, message, audience, severity,
                category, schedule_id, metadata, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                notification_id,
                title,
                message,
                audience.to_db_str(),
                severity.to_db_str(),
                category,
                schedule_id,
                metadata_raw,
                created_at,
            ],
        )?;

        Ok(NotificationRecord {
            notification_id,
            title: title.to_string(),
            message: message.to_string(),
            audience,
            severity,
            category: category.to_string(),
            schedule_id,
            metadata,
            created_at,
        })
    }

    /// 按受众列出通知 (新→旧)
    pub fn list_by_audience(
        &self,
        audience: NotificationAudience,
    ) -> RepositoryResult<Vec<NotificationRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT notification_id, title, message, audience, severity,
                   category, schedule_id, metadata, created_at
            FROM notification
            WHERE audience = ?1
            ORDER BY created_at DESC
            "#,
        )?;

        let records = stmt
            .query_map(params![audience.to_db_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<NotificationRecord>>>()?;

        Ok(records)
    }

    /// 通知总数 (测试/巡检用)
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM notification", [], |row| row.get(0))?;
        Ok(count)
    }
}
