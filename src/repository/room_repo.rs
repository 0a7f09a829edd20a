// ==========================================
// 高校排课调度系统 - 教室目录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::Room;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RoomRepository - 教室目录仓储
// ==========================================
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Room> {
        Ok(Room {
            room_id: row.get(0)?,
            room_name: row.get(1)?,
            building: row.get(2)?,
            capacity: row.get(3)?,
        })
    }

    /// 插入教室, 返回自增ID
    pub fn insert(&self, room_name: &str, building: &str, capacity: i32) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO room (room_name, building, capacity) VALUES (?1, ?2, ?3)",
            params![room_name, building, capacity],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 查询全部教室
    pub fn list_all(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT room_id, room_name, building, capacity FROM room ORDER BY room_name",
        )?;

        let rooms = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Room>>>()?;

        Ok(rooms)
    }

    /// 按教室名查询
    pub fn find_by_name(&self, room_name: &str) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT room_id, room_name, building, capacity FROM room WHERE room_name = ?1",
        )?;

        let room = stmt.query_row(params![room_name], Self::map_row).optional()?;

        Ok(room)
    }

    /// 按ID查询
    pub fn find_by_id(&self, room_id: i64) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT room_id, room_name, building, capacity FROM room WHERE room_id = ?1",
        )?;

        let room = stmt.query_row(params![room_id], Self::map_row).optional()?;

        Ok(room)
    }
}
