// ==========================================
// 高校排课调度系统 - 调课申请领域模型
// ==========================================
// 红线: 终态申请不可变; 字段变更 = 新申请或待审批期间更新, 永不重开终态
// 对齐: change_request 表
// ==========================================

use crate::domain::types::RequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ChangeRequest - 调课申请
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    // ===== 主键与关联 =====
    pub request_id: String,    // 申请ID (UUID)
    pub schedule_id: i64,      // 所属课表
    pub allocation_id: i64,    // 目标排课记录
    pub requester_id: String,  // 申请人 (教师账号ID)

    // ===== 调课内容 =====
    pub original_day: String,  // 原日码 (创建时快照)
    pub original_time: String, // 原时间段 (创建时快照)
    pub new_day: String,       // 新日码
    pub new_time: String,      // 新时间段
    pub reason: String,        // 申请理由

    // ===== 状态机 =====
    pub status: RequestStatus,          // PENDING → APPROVED / REJECTED
    pub admin_notes: Option<String>,    // 审批备注 (驳回理由等)
    pub reviewed_at: Option<DateTime<Utc>>, // 审批时间戳

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
}

// ==========================================
// ChangeRequestView - 列表展示视图
// ==========================================
// 读取时联表 (user_account / allocation_slot), 不属于状态机不变式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequestView {
    pub request: ChangeRequest,
    pub requester_name: String, // 申请人姓名 (缺省回退为账号ID)
    pub course_code: String,    // 目标课程代码
    pub section: String,        // 目标教学班
}
