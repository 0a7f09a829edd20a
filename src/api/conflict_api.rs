// ==========================================
// 高校排课调度系统 - 冲突查询API
// ==========================================
// 职责: 组装仓储数据 + 引擎计算, 对外暴露冲突判定/时段网格/换教室候选
// 红线: 引擎保持纯函数, 数据装载只发生在本层
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::types::{RoomSortMode, Weekday};
use crate::engine::compatibility::{CompatibilityResult, CompatibilityScorer};
use crate::engine::conflict::{ConflictCheck, ConflictDetector};
use crate::engine::error::EngineError;
use crate::engine::reassignment::{RankedRoom, ReassignmentResolver};
use crate::engine::slot_grid::{SlotGridEngine, SlotStatus};
use crate::engine::time_core::TimeCore;
use crate::repository::{AllocationRepository, FeatureRepository, RoomRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// ConflictApi - 冲突查询API
// ==========================================
pub struct ConflictApi {
    allocation_repo: Arc<AllocationRepository>,
    room_repo: Arc<RoomRepository>,
    feature_repo: Arc<FeatureRepository>,
    slot_grid: SlotGridEngine<ConfigManager>,
}

impl ConflictApi {
    /// 创建新的 ConflictApi 实例
    pub fn new(
        allocation_repo: Arc<AllocationRepository>,
        room_repo: Arc<RoomRepository>,
        feature_repo: Arc<FeatureRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            allocation_repo,
            room_repo,
            feature_repo,
            slot_grid: SlotGridEngine::new(config),
        }
    }

    /// 单候选位三类冲突聚合判定
    ///
    /// # 参数
    /// - schedule_id: 课表范围
    /// - room/teacher_name/section: 候选占用维度
    /// - day: 目标星期
    /// - time: 候选时间段字符串 (如 "7:00 AM - 8:30 AM")
    /// - exclude_id: 编辑自身时排除的排课记录
    #[instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub fn check_conflicts(
        &self,
        schedule_id: i64,
        room: &str,
        teacher_name: &str,
        section: &str,
        day: Weekday,
        time: &str,
        exclude_id: Option<i64>,
    ) -> ApiResult<ConflictCheck> {
        let range = TimeCore::parse_schedule_time(time)?;
        let allocations = self.allocation_repo.list_by_schedule(schedule_id)?;

        let check = ConflictDetector::check_all_conflicts(
            &allocations,
            room,
            teacher_name,
            section,
            day,
            range,
            exclude_id,
        )?;

        Ok(check)
    }

    /// 全天时段可行性网格
    #[instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn get_slot_availability(
        &self,
        schedule_id: i64,
        day: Weekday,
        room: &str,
        duration_min: i32,
        teacher_name: &str,
        section: &str,
        exclude_id: Option<i64>,
    ) -> ApiResult<BTreeMap<i32, SlotStatus>> {
        let allocations = self.allocation_repo.list_by_schedule(schedule_id)?;

        let grid = self
            .slot_grid
            .get_slot_availability(
                &allocations,
                day,
                room,
                duration_min,
                teacher_name,
                section,
                exclude_id,
            )
            .await
            .map_err(|e| match e.downcast::<EngineError>() {
                Ok(engine_err) => ApiError::from(*engine_err),
                Err(other) => ApiError::InternalError(other.to_string()),
            })?;

        Ok(grid)
    }

    /// 单教室对单课程的兼容性评分
    pub fn score_room_for_course(
        &self,
        room_id: i64,
        course_code: &str,
    ) -> ApiResult<CompatibilityResult> {
        let room = self
            .room_repo
            .find_by_id(room_id)?
            .ok_or_else(|| ApiError::NotFound(format!("教室{}不存在", room_id)))?;

        let requirements = self
            .feature_repo
            .list_course_requirement_details(course_code)?;
        let features_by_room = self.feature_repo.list_room_feature_details()?;
        let empty = Vec::new();
        let features = features_by_room.get(&room.room_id).unwrap_or(&empty);

        Ok(CompatibilityScorer::score_room(features, &requirements))
    }

    /// 换教室候选列表 (带冲突/兼容性标注, 按指定模式排序)
    #[instrument(skip(self))]
    pub fn rank_rooms_for_reassignment(
        &self,
        allocation_id: i64,
        sort_mode: RoomSortMode,
    ) -> ApiResult<Vec<RankedRoom>> {
        let target = self
            .allocation_repo
            .find_by_id(allocation_id)?
            .ok_or_else(|| ApiError::NotFound(format!("排课记录{}不存在", allocation_id)))?;

        let rooms = self.room_repo.list_all()?;
        let allocations = self.allocation_repo.list_by_schedule(target.schedule_id)?;
        let requirements = self
            .feature_repo
            .list_course_requirement_details(&target.course_code)?;
        let features_by_room = self.feature_repo.list_room_feature_details()?;

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &allocations,
            &requirements,
            &features_by_room,
            sort_mode,
        )?;

        Ok(ranked)
    }
}
