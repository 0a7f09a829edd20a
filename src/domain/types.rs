// ==========================================
// 高校排课调度系统 - 领域类型定义
// ==========================================
// 红线: 所有跨表字符串状态列均有 from_str/to_db_str 双向映射
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 闭合枚举: 日程比较只在此枚举上进行, 原始日码字符串不参与比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Monday => write!(f, "MONDAY"),
            Weekday::Tuesday => write!(f, "TUESDAY"),
            Weekday::Wednesday => write!(f, "WEDNESDAY"),
            Weekday::Thursday => write!(f, "THURSDAY"),
            Weekday::Friday => write!(f, "FRIDAY"),
            Weekday::Saturday => write!(f, "SATURDAY"),
            Weekday::Sunday => write!(f, "SUNDAY"),
        }
    }
}

impl Weekday {
    /// 全部星期（周一起始）
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

// ==========================================
// 调课申请状态 (Request Status)
// ==========================================
// 红线: PENDING 为唯一可变状态, APPROVED/REJECTED 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,  // 待审批
    Approved, // 已批准
    Rejected, // 已驳回
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Approved => write!(f, "APPROVED"),
            RequestStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl RequestStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(RequestStatus::Pending),
            "APPROVED" => Some(RequestStatus::Approved),
            "REJECTED" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

// ==========================================
// 通知受众 (Notification Audience)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationAudience {
    Admin,   // 教务管理员
    Faculty, // 教师
    All,     // 全体
}

impl fmt::Display for NotificationAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationAudience::Admin => write!(f, "ADMIN"),
            NotificationAudience::Faculty => write!(f, "FACULTY"),
            NotificationAudience::All => write!(f, "ALL"),
        }
    }
}

impl NotificationAudience {
    /// 从字符串解析受众
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(NotificationAudience::Admin),
            "FACULTY" => Some(NotificationAudience::Faculty),
            "ALL" => Some(NotificationAudience::All),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NotificationAudience::Admin => "ADMIN",
            NotificationAudience::Faculty => "FACULTY",
            NotificationAudience::All => "ALL",
        }
    }
}

// ==========================================
// 通知级别 (Notification Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationSeverity {
    Info,    // 信息
    Warning, // 警告
    Error,   // 错误
    Success, // 成功
}

impl fmt::Display for NotificationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationSeverity::Info => write!(f, "INFO"),
            NotificationSeverity::Warning => write!(f, "WARNING"),
            NotificationSeverity::Error => write!(f, "ERROR"),
            NotificationSeverity::Success => write!(f, "SUCCESS"),
        }
    }
}

impl NotificationSeverity {
    /// 从字符串解析级别
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INFO" => Some(NotificationSeverity::Info),
            "WARNING" => Some(NotificationSeverity::Warning),
            "ERROR" => Some(NotificationSeverity::Error),
            "SUCCESS" => Some(NotificationSeverity::Success),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NotificationSeverity::Info => "INFO",
            NotificationSeverity::Warning => "WARNING",
            NotificationSeverity::Error => "ERROR",
            NotificationSeverity::Success => "SUCCESS",
        }
    }
}

// ==========================================
// 候选教室排序模式 (Room Sort Mode)
// ==========================================
// 用途: 换教室候选列表的排序维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomSortMode {
    Compatibility, // 兼容性得分降序
    Capacity,      // 容量降序
    Building,      // 楼栋+教室名升序
    Name,          // 教室名升序
}

impl fmt::Display for RoomSortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomSortMode::Compatibility => write!(f, "COMPATIBILITY"),
            RoomSortMode::Capacity => write!(f, "CAPACITY"),
            RoomSortMode::Building => write!(f, "BUILDING"),
            RoomSortMode::Name => write!(f, "NAME"),
        }
    }
}

impl RoomSortMode {
    /// 从字符串解析排序模式
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "COMPATIBILITY" => Some(RoomSortMode::Compatibility),
            "CAPACITY" => Some(RoomSortMode::Capacity),
            "BUILDING" => Some(RoomSortMode::Building),
            "NAME" => Some(RoomSortMode::Name),
            _ => None,
        }
    }
}

// ==========================================
// 兼容性等级 (Compatibility Grade)
// ==========================================
// 红线: 缺失任一强制需求 ⇒ INCOMPATIBLE, 与数值得分无关
// 顺序: Incompatible < Low < Partial < Perfect (NoRequirements 不参与比较)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityGrade {
    Incompatible,   // 不可用: 缺失强制需求
    Low,            // 低匹配: 得分 < 50
    Partial,        // 部分匹配: 得分 >= 50
    Perfect,        // 完全匹配: 得分 >= 100
    NoRequirements, // 课程无需求: 得分无意义 (-1 哨兵)
}

impl fmt::Display for CompatibilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityGrade::Incompatible => write!(f, "INCOMPATIBLE"),
            CompatibilityGrade::Low => write!(f, "LOW"),
            CompatibilityGrade::Partial => write!(f, "PARTIAL"),
            CompatibilityGrade::Perfect => write!(f, "PERFECT"),
            CompatibilityGrade::NoRequirements => write!(f, "NO_REQUIREMENTS"),
        }
    }
}
