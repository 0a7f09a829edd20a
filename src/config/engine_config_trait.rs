// ==========================================
// 高校排课调度系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 用途: 时段网格引擎所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）; 测试用 Mock
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 获取时段网格起始时刻（当日分钟数）
    ///
    /// # 默认值
    /// - 420 (07:00)
    async fn get_grid_start_minutes(&self) -> Result<i32, Box<dyn Error>>;

    /// 获取时段网格结束时刻（当日分钟数, 闭区间）
    ///
    /// # 默认值
    /// - 1200 (20:00)
    async fn get_grid_end_minutes(&self) -> Result<i32, Box<dyn Error>>;

    /// 获取时段枚举步长（分钟）
    ///
    /// # 默认值
    /// - 30
    async fn get_slot_step_minutes(&self) -> Result<i32, Box<dyn Error>>;
}
