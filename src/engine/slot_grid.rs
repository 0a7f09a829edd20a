// ==========================================
// 高校排课调度系统 - 时段可用性网格引擎
// ==========================================
// 职责: 对一天按固定步长枚举起始时刻, 逐一做三类冲突聚合判定
// 输出: 全天可行性图 (供交互式选时控件渲染)
// 说明: 只产出可行性, 不做"最优时段"排序 — 排序/选择是调用方的事
// ==========================================
// 红线: 不直接写库, 只计算和返回
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::types::Weekday;
use crate::domain::AllocationSlot;
use crate::engine::conflict::ConflictDetector;
use crate::engine::error::EngineResult;
use crate::engine::time_core::TimeRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// GridWindow - 枚举窗口
// ==========================================
/// 时段枚举窗口: [start_min, end_min] 内每 step_min 一个候选起点 (闭区间)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWindow {
    pub start_min: i32,
    pub end_min: i32,
    pub step_min: i32,
}

impl Default for GridWindow {
    /// 默认窗口: 07:00 - 20:00, 步长 30 分钟
    fn default() -> Self {
        Self {
            start_min: 420,
            end_min: 1200,
            step_min: 30,
        }
    }
}

// ==========================================
// SlotStatus - 单时段判定结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub available: bool,
    pub room_conflict: bool,
    pub teacher_conflict: bool,
    pub section_conflict: bool,
}

// ==========================================
// SlotGridCore - 纯函数核心
// ==========================================
pub struct SlotGridCore;

impl SlotGridCore {
    /// 构建全天可行性图
    ///
    /// # 参数
    /// - allocations: 当前排课集
    /// - day: 目标星期
    /// - room/teacher_name/section: 候选占用维度
    /// - duration_min: 候选时长 (分钟)
    /// - exclude_id: 编辑自身时排除的记录
    /// - window: 枚举窗口
    ///
    /// # 返回
    /// - BTreeMap<起始分钟, SlotStatus>
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        allocations: &[AllocationSlot],
        day: Weekday,
        room: &str,
        duration_min: i32,
        teacher_name: &str,
        section: &str,
        exclude_id: Option<i64>,
        window: GridWindow,
    ) -> EngineResult<BTreeMap<i32, SlotStatus>> {
        let mut grid = BTreeMap::new();

        let mut offset = window.start_min;
        while offset <= window.end_min {
            // 候选区间直接按字面构造: 窗口尾部的长时段可越过 end_min, 仍照常判定
            let candidate = TimeRange {
                start_min: offset,
                end_min: offset + duration_min,
            };

            let check = ConflictDetector::check_all_conflicts(
                allocations,
                room,
                teacher_name,
                section,
                day,
                candidate,
                exclude_id,
            )?;

            grid.insert(
                offset,
                SlotStatus {
                    available: !check.has_conflict,
                    room_conflict: check.room_conflict,
                    teacher_conflict: check.teacher_conflict,
                    section_conflict: check.section_conflict,
                },
            );

            offset += window.step_min;
        }

        Ok(grid)
    }
}

// ==========================================
// SlotGridEngine - 配置驱动的引擎包装
// ==========================================
// 枚举窗口从 config_kv 读取, 纯逻辑委托给 SlotGridCore
pub struct SlotGridEngine<C>
where
    C: EngineConfigReader,
{
    config: Arc<C>,
}

impl<C> SlotGridEngine<C>
where
    C: EngineConfigReader,
{
    /// 创建新的 SlotGridEngine 实例
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 构建全天可行性图 (窗口取自配置)
    #[instrument(skip(self, allocations))]
    #[allow(clippy::too_many_arguments)]
    pub async fn get_slot_availability(
        &self,
        allocations: &[AllocationSlot],
        day: Weekday,
        room: &str,
        duration_min: i32,
        teacher_name: &str,
        section: &str,
        exclude_id: Option<i64>,
    ) -> Result<BTreeMap<i32, SlotStatus>, Box<dyn Error>> {
        let window = GridWindow {
            start_min: self.config.get_grid_start_minutes().await?,
            end_min: self.config.get_grid_end_minutes().await?,
            step_min: self.config.get_slot_step_minutes().await?,
        };

        let grid = SlotGridCore::build(
            allocations,
            day,
            room,
            duration_min,
            teacher_name,
            section,
            exclude_id,
            window,
        )?;

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    // ==========================================
    // Mock ConfigReader
    // ==========================================
    struct MockConfigReader;

    #[async_trait]
    impl EngineConfigReader for MockConfigReader {
        async fn get_grid_start_minutes(&self) -> Result<i32, Box<dyn Error>> {
            Ok(420)
        }

        async fn get_grid_end_minutes(&self) -> Result<i32, Box<dyn Error>> {
            Ok(1200)
        }

        async fn get_slot_step_minutes(&self) -> Result<i32, Box<dyn Error>> {
            Ok(30)
        }
    }

    fn make_alloc(id: i64, room: &str, day: &str, time: &str) -> AllocationSlot {
        AllocationSlot {
            allocation_id: id,
            schedule_id: 1,
            room: room.to_string(),
            building: "主楼".to_string(),
            section: "BSCS1A".to_string(),
            teacher_name: "张老师".to_string(),
            schedule_day: day.to_string(),
            schedule_time: time.to_string(),
            course_code: "CS101".to_string(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_grid_enumeration_bounds() {
        let grid = SlotGridCore::build(
            &[],
            Weekday::Monday,
            "101",
            60,
            "",
            "BSCS1B",
            None,
            GridWindow::default(),
        )
        .unwrap();

        // 07:00 - 20:00 含两端, 步长 30 → 27 个候选起点
        assert_eq!(grid.len(), 27);
        assert!(grid.contains_key(&420));
        assert!(grid.contains_key(&1200));
        assert!(!grid.contains_key(&1230));
        // 空排课集: 全部可用
        assert!(grid.values().all(|s| s.available));
    }

    #[test]
    fn test_grid_marks_occupied_slots() {
        // 101 教室周一 08:00-09:30 被占
        let allocations = vec![make_alloc(1, "101", "M", "8:00 AM - 9:30 AM")];

        let grid = SlotGridCore::build(
            &allocations,
            Weekday::Monday,
            "101",
            60,
            "",
            "BSCS1B",
            None,
            GridWindow::default(),
        )
        .unwrap();

        // 07:00 起 60 分钟 [420,480) 与 [480,570) 相接 → 可用
        assert!(grid[&420].available);
        // 07:30 起 [450,510) 与 [480,570) 重叠 → 教室冲突
        assert!(!grid[&450].available);
        assert!(grid[&450].room_conflict);
        assert!(!grid[&450].teacher_conflict);
        // 08:00 / 08:30 / 09:00 起均重叠
        assert!(!grid[&480].available);
        assert!(!grid[&510].available);
        assert!(!grid[&540].available);
        // 09:30 起与占用端点相接 → 可用
        assert!(grid[&570].available);
    }

    #[tokio::test]
    async fn test_engine_reads_window_from_config() {
        let engine = SlotGridEngine::new(Arc::new(MockConfigReader));

        let grid = engine
            .get_slot_availability(&[], Weekday::Tuesday, "101", 90, "", "BSCS1A", None)
            .await
            .unwrap();

        assert_eq!(grid.len(), 27);
        assert!(grid.values().all(|s| s.available));
    }

    #[tokio::test]
    async fn test_engine_propagates_dirty_data_error() {
        let engine = SlotGridEngine::new(Arc::new(MockConfigReader));
        let allocations = vec![make_alloc(9, "101", "M", "not-a-time")];

        let result = engine
            .get_slot_availability(&allocations, Weekday::Monday, "101", 60, "", "BSCS1A", None)
            .await;

        assert!(result.is_err());
    }
}
