// ==========================================
// 高校排课调度系统 - 设备需求仓储
// ==========================================
// 职责: feature_tag / room_feature / course_requirement 三表的 CRUD 与联表读取
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::feature::{CourseRequirementDetail, RoomFeatureDetail};
use crate::domain::FeatureTag;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// FeatureRepository - 设备需求仓储
// ==========================================
pub struct FeatureRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FeatureRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入设备标签, 返回自增ID
    pub fn insert_tag(&self, tag_name: &str, tag_category: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO feature_tag (tag_name, tag_category) VALUES (?1, ?2)",
            params![tag_name, tag_category],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 查询全部设备标签
    pub fn list_tags(&self) -> RepositoryResult<Vec<FeatureTag>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT tag_id, tag_name, tag_category FROM feature_tag ORDER BY tag_id")?;

        let tags = stmt
            .query_map([], |row| {
                Ok(FeatureTag {
                    tag_id: row.get(0)?,
                    tag_name: row.get(1)?,
                    tag_category: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<FeatureTag>>>()?;

        Ok(tags)
    }

    /// 插入或更新教室设备
    pub fn upsert_room_feature(
        &self,
        room_id: i64,
        tag_id: i64,
        quantity: i32,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO room_feature (room_id, tag_id, quantity)
            VALUES (?1, ?2, ?3)
            "#,
            params![room_id, tag_id, quantity],
        )?;

        Ok(())
    }

    /// 插入或更新课程需求
    pub fn upsert_course_requirement(
        &self,
        course_code: &str,
        tag_id: i64,
        is_mandatory: bool,
        min_quantity: i32,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO course_requirement (course_code, tag_id, is_mandatory, min_quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![course_code, tag_id, is_mandatory, min_quantity],
        )?;

        Ok(())
    }

    /// 读取全部教室的设备明细 (已联标签元数据), 按教室ID分组
    pub fn list_room_feature_details(
        &self,
    ) -> RepositoryResult<HashMap<i64, Vec<RoomFeatureDetail>>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT rf.room_id, rf.tag_id, ft.tag_name, rf.quantity
            FROM room_feature rf
            JOIN feature_tag ft ON ft.tag_id = rf.tag_id
            ORDER BY rf.room_id, rf.tag_id
            "#,
        )?;

        let details = stmt
            .query_map([], |row| {
                Ok(RoomFeatureDetail {
                    room_id: row.get(0)?,
                    tag_id: row.get(1)?,
                    tag_name: row.get(2)?,
                    quantity: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<RoomFeatureDetail>>>()?;

        let mut by_room: HashMap<i64, Vec<RoomFeatureDetail>> = HashMap::new();
        for detail in details {
            by_room.entry(detail.room_id).or_default().push(detail);
        }

        Ok(by_room)
    }

    /// 读取一门课程的需求明细 (已联标签元数据)
    pub fn list_course_requirement_details(
        &self,
        course_code: &str,
    ) -> RepositoryResult<Vec<CourseRequirementDetail>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT cr.course_code, cr.tag_id, ft.tag_name, cr.is_mandatory, cr.min_quantity
            FROM course_requirement cr
            JOIN feature_tag ft ON ft.tag_id = cr.tag_id
            WHERE cr.course_code = ?1
            ORDER BY cr.tag_id
            "#,
        )?;

        let details = stmt
            .query_map(params![course_code], |row| {
                Ok(CourseRequirementDetail {
                    course_code: row.get(0)?,
                    tag_id: row.get(1)?,
                    tag_name: row.get(2)?,
                    is_mandatory: row.get(3)?,
                    min_quantity: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<CourseRequirementDetail>>>()?;

        Ok(details)
    }
}
