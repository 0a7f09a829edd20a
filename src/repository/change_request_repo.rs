// ==========================================
// 高校排课调度系统 - 调课申请仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 审批落库 = 申请状态 + 排课记录日/时 在同一事务内写入,
//       状态守卫 (status='PENDING') 与乐观锁守卫 (revision) 均在事务内复核
// ==========================================

use crate::domain::change_request::{ChangeRequest, ChangeRequestView};
use crate::domain::types::RequestStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    request_id, schedule_id, allocation_id, requester_id,
    original_day, original_time, new_day, new_time, reason,
    status, admin_notes, reviewed_at, created_at
"#;

// ==========================================
// ChangeRequestRepository - 调课申请仓储
// ==========================================
pub struct ChangeRequestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ChangeRequestRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ChangeRequest> {
        let status_raw: String = row.get(9)?;
        let status = RequestStatus::from_str(&status_raw).unwrap_or(RequestStatus::Pending);

        Ok(ChangeRequest {
            request_id: row.get(0)?,
            schedule_id: row.get(1)?,
            allocation_id: row.get(2)?,
            requester_id: row.get(3)?,
            original_day: row.get(4)?,
            original_time: row.get(5)?,
            new_day: row.get(6)?,
            new_time: row.get(7)?,
            reason: row.get(8)?,
            status,
            admin_notes: row.get(10)?,
            reviewed_at: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    /// 插入待审批申请, 返回完整记录
    #[allow(clippy::too_many_arguments)]
    pub fn insert_pending(
        &self,
        schedule_id: i64,
        allocation_id: i64,
        requester_id: &str,
        original_day: &str,
        original_time: &str,
        new_day: &str,
        new_time: &str,
        reason: &str,
    ) -> RepositoryResult<ChangeRequest> {
        let conn = self.get_conn()?;
        let request_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO change_request (
                request_id, schedule_id, allocation_id, requester_id,
                original_day, original_time, new_day, new_time, reason,
                status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'PENDING', ?10)
            "#,
            params![
                request_id,
                schedule_id,
                allocation_id,
                requester_id,
                original_day,
                original_time,
                new_day,
                new_time,
                reason,
                created_at,
            ],
        )?;

        Ok(ChangeRequest {
            request_id,
            schedule_id,
            allocation_id,
            requester_id: requester_id.to_string(),
            original_day: original_day.to_string(),
            original_time: original_time.to_string(),
            new_day: new_day.to_string(),
            new_time: new_time.to_string(),
            reason: reason.to_string(),
            status: RequestStatus::Pending,
            admin_notes: None,
            reviewed_at: None,
            created_at,
        })
    }

    /// 按ID查询申请
    pub fn find_by_id(&self, request_id: &str) -> RepositoryResult<Option<ChangeRequest>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM change_request WHERE request_id = ?1",
            SELECT_COLUMNS
        ))?;

        let request = stmt.query_row(params![request_id], Self::map_row).optional()?;

        Ok(request)
    }

    /// 批准申请 (单事务: 状态守卫 + 乐观锁守卫 + 双写)
    ///
    /// # 参数
    /// - expected_revision: 审批方在冲突复核前读到的排课记录版本号
    ///
    /// # 返回
    /// - Err(InvalidStateTransition): 申请已非 PENDING
    /// - Err(OptimisticLockFailure): 排课记录已被他人改写 (版本号不符)
    pub fn approve_in_transaction(
        &self,
        request_id: &str,
        allocation_id: i64,
        new_day: &str,
        new_time: &str,
        expected_revision: i64,
        admin_notes: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let steps = Self::approve_steps(
            &conn,
            request_id,
            allocation_id,
            new_day,
            new_time,
            expected_revision,
            admin_notes,
            reviewed_at,
        );

        match steps {
            Ok(()) => {
                conn.execute("COMMIT", [])
                    .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// 批准事务内的守卫与双写步骤
    #[allow(clippy::too_many_arguments)]
    fn approve_steps(
        conn: &Connection,
        request_id: &str,
        allocation_id: i64,
        new_day: &str,
        new_time: &str,
        expected_revision: i64,
        admin_notes: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        // === 守卫 1: 申请必须仍为 PENDING ===
        let status: String = conn
            .query_row(
                "SELECT status FROM change_request WHERE request_id = ?1",
                params![request_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "ChangeRequest".to_string(),
                id: request_id.to_string(),
            })?;

        if status != RequestStatus::Pending.to_db_str() {
            return Err(RepositoryError::InvalidStateTransition {
                from: status,
                to: RequestStatus::Approved.to_db_str().to_string(),
            });
        }

        // === 守卫 2: 排课记录版本号必须与审批方读到的一致 ===
        let actual_revision: i64 = conn
            .query_row(
                "SELECT revision FROM allocation_slot WHERE allocation_id = ?1",
                params![allocation_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "AllocationSlot".to_string(),
                id: allocation_id.to_string(),
            })?;

        if actual_revision != expected_revision {
            return Err(RepositoryError::OptimisticLockFailure {
                allocation_id,
                expected: expected_revision,
                actual: actual_revision,
            });
        }

        // === 双写: 申请终态 + 排课记录日/时 ===
        conn.execute(
            r#"
            UPDATE change_request
            SET status = 'APPROVED', admin_notes = ?2, reviewed_at = ?3
            WHERE request_id = ?1 AND status = 'PENDING'
            "#,
            params![request_id, admin_notes, reviewed_at],
        )?;

        conn.execute(
            r#"
            UPDATE allocation_slot
            SET schedule_day = ?2, schedule_time = ?3,
                revision = revision + 1, updated_at = ?4
            WHERE allocation_id = ?1 AND revision = ?5
            "#,
            params![allocation_id, new_day, new_time, reviewed_at, expected_revision],
        )?;

        Ok(())
    }

    /// 驳回申请 (状态守卫更新, 不触碰排课记录)
    pub fn reject_pending(
        &self,
        request_id: &str,
        admin_notes: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE change_request
            SET status = 'REJECTED', admin_notes = ?2, reviewed_at = ?3
            WHERE request_id = ?1 AND status = 'PENDING'
            "#,
            params![request_id, admin_notes, reviewed_at],
        )?;

        if affected == 1 {
            return Ok(());
        }

        // 守卫未命中: 区分"不存在"与"已终态"
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM change_request WHERE request_id = ?1",
                params![request_id],
                |row| row.get(0),
            )
            .optional()?;

        match status {
            None => Err(RepositoryError::NotFound {
                entity: "ChangeRequest".to_string(),
                id: request_id.to_string(),
            }),
            Some(from) => Err(RepositoryError::InvalidStateTransition {
                from,
                to: RequestStatus::Rejected.to_db_str().to_string(),
            }),
        }
    }

    // ==========================================
    // 列表视图 (读取时联表: 申请人姓名 + 课程/教学班)
    // ==========================================

    fn query_views(
        &self,
        where_clause: &str,
        param: &dyn rusqlite::ToSql,
    ) -> RepositoryResult<Vec<ChangeRequestView>> {
        let conn = self.get_conn()?;

        let sql = format!(
            r#"
            SELECT
                cr.request_id, cr.schedule_id, cr.allocation_id, cr.requester_id,
                cr.original_day, cr.original_time, cr.new_day, cr.new_time, cr.reason,
                cr.status, cr.admin_notes, cr.reviewed_at, cr.created_at,
                COALESCE(ua.display_name, cr.requester_id) AS requester_name,
                al.course_code, al.section
            FROM change_request cr
            LEFT JOIN user_account ua ON ua.user_id = cr.requester_id
            JOIN allocation_slot al ON al.allocation_id = cr.allocation_id
            WHERE {}
            ORDER BY cr.created_at DESC
            "#,
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;

        let views = stmt
            .query_map(params![param], |row| {
                let request = Self::map_row(row)?;
                Ok(ChangeRequestView {
                    request,
                    requester_name: row.get(13)?,
                    course_code: row.get(14)?,
                    section: row.get(15)?,
                })
            })?
            .collect::<SqliteResult<Vec<ChangeRequestView>>>()?;

        Ok(views)
    }

    /// 按课表列出申请
    pub fn list_views_by_schedule(
        &self,
        schedule_id: i64,
    ) -> RepositoryResult<Vec<ChangeRequestView>> {
        self.query_views("cr.schedule_id = ?1", &schedule_id)
    }

    /// 按申请人列出申请
    pub fn list_views_by_requester(
        &self,
        requester_id: &str,
    ) -> RepositoryResult<Vec<ChangeRequestView>> {
        self.query_views("cr.requester_id = ?1", &requester_id.to_string())
    }

    /// 按状态列出申请
    pub fn list_views_by_status(
        &self,
        status: RequestStatus,
    ) -> RepositoryResult<Vec<ChangeRequestView>> {
        self.query_views("cr.status = ?1", &status.to_db_str().to_string())
    }
}
