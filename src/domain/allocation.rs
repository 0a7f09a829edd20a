// ==========================================
// 高校排课调度系统 - 排课领域模型
// ==========================================
// 用途: 引擎层只读; 仅调课审批通过时由仓储层改写 schedule_day/schedule_time
// 对齐: allocation_slot / room / schedule 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationSlot - 已提交的排课记录
// ==========================================
// 红线: 时间比较永远走引擎的分钟归一化, 原始字符串不直接比较
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSlot {
    // ===== 主键与关联 =====
    pub allocation_id: i64,     // 排课记录ID
    pub schedule_id: i64,       // 所属课表ID

    // ===== 地点 =====
    pub room: String,           // 教室名 (与 room.room_name 对齐)
    pub building: String,       // 楼栋

    // ===== 课程 =====
    pub section: String,        // 班级/教学班 (可带 _LEC/_LAB 后缀)
    pub teacher_name: String,   // 任课教师 (空串 = 未指派)
    pub course_code: String,    // 课程代码

    // ===== 时间 (原始字符串, 多种格式并存) =====
    pub schedule_day: String,   // 日码 (可为复合码, 如 "TTH")
    pub schedule_time: String,  // 时间段 (如 "7:00 AM - 8:30 AM")

    // ===== 并发控制 =====
    pub revision: i64,          // 乐观锁版本号, 每次改写日/时自增

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// Room - 教室目录
// ==========================================
// 用途: 换教室候选集; 管理端维护, 引擎只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i64,       // 教室ID
    pub room_name: String,  // 教室名 (全局唯一)
    pub building: String,   // 楼栋
    pub capacity: i32,      // 容量 (人)
}

// ==========================================
// Schedule - 课表
// ==========================================
// is_locked: 课表级开关, 只在调课申请创建时消费 (审批不受限)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: i64,
    pub schedule_name: String,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}
