// ==========================================
// 高校排课调度系统 - 排课记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 注: 排课记录的日/时改写只发生在调课审批事务内 (change_request_repo)
// ==========================================

use crate::domain::AllocationSlot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    allocation_id, schedule_id, room, building, section, teacher_name,
    schedule_day, schedule_time, course_code, revision, created_at, updated_at
"#;

// ==========================================
// AllocationRepository - 排课记录仓储
// ==========================================
pub struct AllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AllocationRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<AllocationSlot> {
        Ok(AllocationSlot {
            allocation_id: row.get(0)?,
            schedule_id: row.get(1)?,
            room: row.get(2)?,
            building: row.get(3)?,
            section: row.get(4)?,
            teacher_name: row.get(5)?,
            schedule_day: row.get(6)?,
            schedule_time: row.get(7)?,
            course_code: row.get(8)?,
            revision: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    /// 插入排课记录, 返回自增ID
    pub fn insert(
        &self,
        schedule_id: i64,
        room: &str,
        building: &str,
        section: &str,
        teacher_name: &str,
        schedule_day: &str,
        schedule_time: &str,
        course_code: &str,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO allocation_slot (
                schedule_id, room, building, section, teacher_name,
                schedule_day, schedule_time, course_code, revision, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10)
            "#,
            params![
                schedule_id,
                room,
                building,
                section,
                teacher_name,
                schedule_day,
                schedule_time,
                course_code,
                now,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按ID查询排课记录
    pub fn find_by_id(&self, allocation_id: i64) -> RepositoryResult<Option<AllocationSlot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM allocation_slot WHERE allocation_id = ?1",
            SELECT_COLUMNS
        ))?;

        let slot = stmt
            .query_row(params![allocation_id], Self::map_row)
            .optional()?;

        Ok(slot)
    }

    /// 查询一张课表的全部排课记录
    pub fn list_by_schedule(&self, schedule_id: i64) -> RepositoryResult<Vec<AllocationSlot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM allocation_slot WHERE schedule_id = ?1 ORDER BY allocation_id",
            SELECT_COLUMNS
        ))?;

        let slots = stmt
            .query_map(params![schedule_id], Self::map_row)?
            .collect::<SqliteResult<Vec<AllocationSlot>>>()?;

        Ok(slots)
    }
}
