// ==========================================
// 高校排课调度系统 - 课表管理API
// ==========================================
// 职责: 课表创建与锁定开关
// 红线: 锁定开关切换必须向教师受众广播通知
// 注: 锁只在申请创建时消费; 已有 PENDING 申请在锁定后仍可审批
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::notification::category;
use crate::domain::types::{NotificationAudience, NotificationSeverity};
use crate::domain::Schedule;
use crate::i18n;
use crate::repository::{NotificationRepository, ScheduleRepository};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// ScheduleApi - 课表管理API
// ==========================================
pub struct ScheduleApi {
    schedule_repo: Arc<ScheduleRepository>,
    notification_repo: Arc<NotificationRepository>,
}

impl ScheduleApi {
    /// 创建新的 ScheduleApi 实例
    pub fn new(
        schedule_repo: Arc<ScheduleRepository>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            schedule_repo,
            notification_repo,
        }
    }

    /// 创建课表, 返回ID
    pub fn create_schedule(&self, schedule_name: &str) -> ApiResult<i64> {
        if schedule_name.trim().is_empty() {
            return Err(ApiError::ValidationError("schedule_name 不能为空".to_string()));
        }
        Ok(self.schedule_repo.insert(schedule_name)?)
    }

    /// 查询课表
    pub fn get_schedule(&self, schedule_id: i64) -> ApiResult<Schedule> {
        self.schedule_repo
            .find_by_id(schedule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("课表{}不存在", schedule_id)))
    }

    /// 切换课表锁定标志, 并向教师受众广播
    #[instrument(skip(self))]
    pub fn set_schedule_lock(
        &self,
        schedule_id: i64,
        locked: bool,
        actor: &str,
    ) -> ApiResult<()> {
        let updated = self.schedule_repo.set_locked(schedule_id, locked)?;
        if !updated {
            return Err(ApiError::NotFound(format!("课表{}不存在", schedule_id)));
        }

        let (title_key, message, severity) = if locked {
            (
                "notification.schedule_locked_title",
                "课表已锁定, 暂停接收新的调课申请; 已提交的申请仍会正常审批",
                NotificationSeverity::Warning,
            )
        } else {
            (
                "notification.schedule_unlocked_title",
                "课表已解锁, 恢复接收调课申请",
                NotificationSeverity::Info,
            )
        };

        self.notification_repo.insert(
            &i18n::t(title_key),
            message,
            NotificationAudience::Faculty,
            severity,
            category::SCHEDULE_LOCK,
            Some(schedule_id),
            Some(json!({ "locked": locked, "actor": actor })),
        )?;

        tracing::info!(schedule_id, locked, actor, "课表锁定状态已切换");
        Ok(())
    }
}
