// ==========================================
// 高校排课调度系统 - 课表仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::Schedule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleRepository - 课表仓储
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Schedule> {
        Ok(Schedule {
            schedule_id: row.get(0)?,
            schedule_name: row.get(1)?,
            is_locked: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    /// 创建课表, 返回自增ID
    pub fn insert(&self, schedule_name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO schedule (schedule_name, is_locked, created_at) VALUES (?1, 0, ?2)",
            params![schedule_name, Utc::now()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按ID查询课表
    pub fn find_by_id(&self, schedule_id: i64) -> RepositoryResult<Option<Schedule>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT schedule_id, schedule_name, is_locked, created_at FROM schedule WHERE schedule_id = ?1",
        )?;

        let schedule = stmt.query_row(params![schedule_id], Self::map_row).optional()?;

        Ok(schedule)
    }

    /// 更新课表锁定标志
    ///
    /// # 返回
    /// - Ok(true): 已更新
    /// - Ok(false): 课表不存在
    pub fn set_locked(&self, schedule_id: i64, locked: bool) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE schedule SET is_locked = ?2 WHERE schedule_id = ?1",
            params![schedule_id, locked],
        )?;

        Ok(affected == 1)
    }
}
