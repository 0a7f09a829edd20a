// ==========================================
// 高校排课调度系统 - 通知领域模型
// ==========================================
// 红线: 申请创建/审批/课表锁切换必须落通知记录
// 用途: 审计追踪, 外部投递层 (邮件等) 只读消费
// 对齐: notification 表
// ==========================================

use crate::domain::types::{NotificationAudience, NotificationSeverity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// NotificationRecord - 通知记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    // ===== 主键 =====
    pub notification_id: String, // 通知ID (UUID)

    // ===== 内容 =====
    pub title: String,
    pub message: String,

    // ===== 投递维度 =====
    pub audience: NotificationAudience, // ADMIN / FACULTY / ALL
    pub severity: NotificationSeverity, // INFO / WARNING / ERROR / SUCCESS
    pub category: String,               // 业务类别 (如 "CHANGE_REQUEST")

    // ===== 关联与扩展 =====
    pub schedule_id: Option<i64>,
    pub metadata: Option<JsonValue>, // 扩展负载 (JSON)

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
}

// ==========================================
// 通知类别常量
// ==========================================
pub mod category {
    pub const CHANGE_REQUEST: &str = "CHANGE_REQUEST";
    pub const SCHEDULE_LOCK: &str = "SCHEDULE_LOCK";
}
