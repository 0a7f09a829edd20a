// ==========================================
// 高校排课调度系统 - 调课申请API
// ==========================================
// 职责: 调课申请状态机 (创建 / 审批 / 列表)
// 红线: 锁定课表上创建申请被拒且不落任何记录
// 红线: 终态申请不可再审批
// 红线: 批准 = 针对当前排课集复核冲突 + 单事务双写 (状态守卫 + 乐观锁守卫)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::change_request::{ChangeRequest, ChangeRequestView};
use crate::domain::notification::category;
use crate::domain::types::{
    NotificationAudience, NotificationSeverity, RequestStatus, Weekday,
};
use crate::engine::conflict::ConflictDetector;
use crate::engine::time_core::TimeCore;
use crate::i18n;
use crate::repository::{
    AllocationRepository, ChangeRequestRepository, NotificationRepository, ScheduleRepository,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// 输入/决定类型
// ==========================================

/// 创建调课申请的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChangeRequestInput {
    pub schedule_id: i64,
    pub allocation_id: i64,
    pub requester_id: String,
    pub new_day: String,
    pub new_time: String,
    pub reason: String,
}

/// 审批决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestDecision {
    Approve,
    Reject,
}

// ==========================================
// RequestApi - 调课申请API
// ==========================================
pub struct RequestApi {
    schedule_repo: Arc<ScheduleRepository>,
    allocation_repo: Arc<AllocationRepository>,
    request_repo: Arc<ChangeRequestRepository>,
    notification_repo: Arc<NotificationRepository>,
}

impl RequestApi {
    /// 创建新的 RequestApi 实例
    pub fn new(
        schedule_repo: Arc<ScheduleRepository>,
        allocation_repo: Arc<AllocationRepository>,
        request_repo: Arc<ChangeRequestRepository>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            schedule_repo,
            allocation_repo,
            request_repo,
            notification_repo,
        }
    }

    // ==========================================
    // 创建
    // ==========================================

    /// 创建调课申请 (状态机入口: PENDING)
    ///
    /// # 守卫顺序
    /// 1. 必填字段校验
    /// 2. 课表存在 + 未锁定 (锁定 → 拒绝, 不落任何记录)
    /// 3. 排课记录存在且属于该课表
    /// 4. 新日码/新时间段可解析
    #[instrument(skip(self, input), fields(schedule_id = input.schedule_id, allocation_id = input.allocation_id))]
    pub fn create_change_request(
        &self,
        input: CreateChangeRequestInput,
    ) -> ApiResult<ChangeRequest> {
        // === 守卫 1: 必填字段 ===
        if input.requester_id.trim().is_empty() {
            return Err(ApiError::ValidationError("requester_id 不能为空".to_string()));
        }
        if input.new_day.trim().is_empty() {
            return Err(ApiError::ValidationError("new_day 不能为空".to_string()));
        }
        if input.new_time.trim().is_empty() {
            return Err(ApiError::ValidationError("new_time 不能为空".to_string()));
        }
        if input.reason.trim().is_empty() {
            return Err(ApiError::ValidationError("reason 不能为空".to_string()));
        }

        // === 守卫 2: 课表存在且未锁定 ===
        let schedule = self
            .schedule_repo
            .find_by_id(input.schedule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("课表{}不存在", input.schedule_id)))?;

        if schedule.is_locked {
            tracing::info!(
                schedule_id = input.schedule_id,
                "课表已锁定, 拒绝创建调课申请"
            );
            return Err(ApiError::ScheduleLocked(input.schedule_id));
        }

        // === 守卫 3: 排课记录存在且属于该课表 ===
        let allocation = self
            .allocation_repo
            .find_by_id(input.allocation_id)?
            .ok_or_else(|| ApiError::NotFound(format!("排课记录{}不存在", input.allocation_id)))?;

        if allocation.schedule_id != input.schedule_id {
            return Err(ApiError::ValidationError(format!(
                "排课记录{}不属于课表{}",
                input.allocation_id, input.schedule_id
            )));
        }

        // === 守卫 4: 新日/时可解析 ===
        TimeCore::parse_schedule_time(&input.new_time)?;
        TimeCore::expand_day_code(&input.new_day)?;

        // === 落库: 原日/时取创建时快照 ===
        let request = self.request_repo.insert_pending(
            input.schedule_id,
            input.allocation_id,
            &input.requester_id,
            &allocation.schedule_day,
            &allocation.schedule_time,
            &input.new_day,
            &input.new_time,
            &input.reason,
        )?;

        // === 通知教务管理员 ===
        self.notification_repo.insert(
            &i18n::t("notification.request_created_title"),
            &format!(
                "{} {} 申请调课: {} {} → {} {} (理由: {})",
                allocation.course_code,
                allocation.section,
                request.original_day,
                request.original_time,
                request.new_day,
                request.new_time,
                request.reason,
            ),
            NotificationAudience::Admin,
            NotificationSeverity::Info,
            category::CHANGE_REQUEST,
            Some(request.schedule_id),
            Some(json!({
                "request_id": request.request_id,
                "allocation_id": request.allocation_id,
                "requester_id": request.requester_id,
            })),
        )?;

        tracing::info!(request_id = %request.request_id, "调课申请已创建");
        Ok(request)
    }

    // ==========================================
    // 审批
    // ==========================================

    /// 审批调课申请 (PENDING → APPROVED / REJECTED)
    ///
    /// # 批准路径
    /// 1. 状态守卫: 申请必须为 PENDING
    /// 2. 冲突复核: 对**当前**排课集逐星期重跑三类冲突判定
    /// 3. 单事务双写: 申请终态 + 排课记录日/时 (状态守卫 + revision 乐观锁在事务内复核)
    ///
    /// # 驳回路径
    /// - 状态守卫更新, 不触碰排课记录; admin_notes 记录驳回理由
    #[instrument(skip(self))]
    pub fn decide_change_request(
        &self,
        request_id: &str,
        decision: RequestDecision,
        admin_notes: Option<String>,
    ) -> ApiResult<ChangeRequest> {
        let request = self
            .request_repo
            .find_by_id(request_id)?
            .ok_or_else(|| ApiError::NotFound(format!("调课申请{}不存在", request_id)))?;

        // === 状态守卫: 终态不可再审批 ===
        if request.status.is_terminal() {
            return Err(ApiError::InvalidStateTransition {
                from: request.status.to_db_str().to_string(),
                to: match decision {
                    RequestDecision::Approve => RequestStatus::Approved.to_db_str().to_string(),
                    RequestDecision::Reject => RequestStatus::Rejected.to_db_str().to_string(),
                },
            });
        }

        match decision {
            RequestDecision::Approve => self.approve(request, admin_notes),
            RequestDecision::Reject => self.reject(request, admin_notes),
        }
    }

    /// 批准: 冲突复核 + 事务双写 + 通知申请人
    fn approve(
        &self,
        request: ChangeRequest,
        admin_notes: Option<String>,
    ) -> ApiResult<ChangeRequest> {
        let allocation = self
            .allocation_repo
            .find_by_id(request.allocation_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("排课记录{}不存在", request.allocation_id))
            })?;

        let range = TimeCore::parse_schedule_time(&request.new_time)?;
        let days: BTreeSet<Weekday> = TimeCore::expand_day_code(&request.new_day)?;

        // === 冲突复核: 提交后到审批前可能有新占用出现 ===
        let allocations = self.allocation_repo.list_by_schedule(request.schedule_id)?;
        for day in &days {
            let check = ConflictDetector::check_all_conflicts(
                &allocations,
                &allocation.room,
                &allocation.teacher_name,
                &allocation.section,
                *day,
                range,
                Some(allocation.allocation_id),
            )?;

            if check.has_conflict {
                let mut kinds = Vec::new();
                if check.room_conflict {
                    kinds.push("教室");
                }
                if check.teacher_conflict {
                    kinds.push("教师");
                }
                if check.section_conflict {
                    kinds.push("教学班");
                }
                tracing::warn!(
                    request_id = %request.request_id,
                    day = %day,
                    kinds = ?kinds,
                    "批准复核发现冲突, 审批中止"
                );
                return Err(ApiError::SlotConflict(format!(
                    "{} {} 在 {} 存在{}冲突",
                    request.new_day,
                    request.new_time,
                    day,
                    kinds.join("/"),
                )));
            }
        }

        // === 单事务双写 (revision 乐观锁复核并发改写) ===
        let reviewed_at = Utc::now();
        self.request_repo.approve_in_transaction(
            &request.request_id,
            request.allocation_id,
            &request.new_day,
            &request.new_time,
            allocation.revision,
            admin_notes.as_deref(),
            reviewed_at,
        )?;

        // === 通知申请人 ===
        self.notification_repo.insert(
            &i18n::t("notification.request_approved_title"),
            &format!(
                "{} {} 的调课申请已批准: {} {} → {} {}",
                allocation.course_code,
                allocation.section,
                request.original_day,
                request.original_time,
                request.new_day,
                request.new_time,
            ),
            NotificationAudience::Faculty,
            NotificationSeverity::Success,
            category::CHANGE_REQUEST,
            Some(request.schedule_id),
            Some(json!({
                "request_id": request.request_id,
                "requester_id": request.requester_id,
            })),
        )?;

        tracing::info!(request_id = %request.request_id, "调课申请已批准");

        let updated = self
            .request_repo
            .find_by_id(&request.request_id)?
            .ok_or_else(|| ApiError::NotFound(format!("调课申请{}不存在", request.request_id)))?;
        Ok(updated)
    }

    /// 驳回: 状态守卫更新 + 通知申请人 (含驳回理由)
    fn reject(
        &self,
        request: ChangeRequest,
        admin_notes: Option<String>,
    ) -> ApiResult<ChangeRequest> {
        let reviewed_at = Utc::now();
        self.request_repo
            .reject_pending(&request.request_id, admin_notes.as_deref(), reviewed_at)?;

        let mut message = format!(
            "调课申请已驳回: {} {} → {} {}",
            request.original_day, request.original_time, request.new_day, request.new_time,
        );
        if let Some(notes) = admin_notes.as_deref() {
            if !notes.trim().is_empty() {
                message.push_str(&format!(" (理由: {})", notes));
            }
        }

        self.notification_repo.insert(
            &i18n::t("notification.request_rejected_title"),
            &message,
            NotificationAudience::Faculty,
            NotificationSeverity::Warning,
            category::CHANGE_REQUEST,
            Some(request.schedule_id),
            Some(json!({
                "request_id": request.request_id,
                "requester_id": request.requester_id,
            })),
        )?;

        tracing::info!(request_id = %request.request_id, "调课申请已驳回");

        let updated = self
            .request_repo
            .find_by_id(&request.request_id)?
            .ok_or_else(|| ApiError::NotFound(format!("调课申请{}不存在", request.request_id)))?;
        Ok(updated)
    }

    // ==========================================
    // 列表
    // ==========================================

    /// 按课表列出申请 (含申请人姓名/课程/教学班联查)
    pub fn list_requests_by_schedule(
        &self,
        schedule_id: i64,
    ) -> ApiResult<Vec<ChangeRequestView>> {
        Ok(self.request_repo.list_views_by_schedule(schedule_id)?)
    }

    /// 按申请人列出申请
    pub fn list_requests_by_requester(
        &self,
        requester_id: &str,
    ) -> ApiResult<Vec<ChangeRequestView>> {
        Ok(self.request_repo.list_views_by_requester(requester_id)?)
    }

    /// 按状态列出申请
    pub fn list_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> ApiResult<Vec<ChangeRequestView>> {
        Ok(self.request_repo.list_views_by_status(status)?)
    }
}
