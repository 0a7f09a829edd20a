// ==========================================
// 高校排课调度系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (冲突检测 + 调课审批, 人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CompatibilityGrade, NotificationAudience, NotificationSeverity, RequestStatus, RoomSortMode,
    Weekday,
};

// 领域实体
pub use domain::{
    AllocationSlot, ChangeRequest, CourseRequirement, FeatureTag, NotificationRecord, Room,
    RoomFeature, Schedule, UserAccount,
};

// 引擎
pub use engine::{
    CompatibilityResult, CompatibilityScorer, ConflictCheck, ConflictDetector, RankedRoom,
    ReassignmentResolver, SlotGridCore, SlotGridEngine, SlotStatus, TimeCore, TimeRange,
};

// API
pub use api::{ConflictApi, RequestApi, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "高校排课调度系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
