// ==========================================
// 高校排课调度系统 - 换教室候选解析引擎
// ==========================================
// 职责: 组合冲突检测 + 兼容性评分, 产出带标注的候选教室排序列表
// 红线: 被占用或强制不兼容的教室照常展示, 但不可选并携带原因
// 红线: 无状态、无副作用; 教师改派走冲突检测的教师维度, 无评分维度
// ==========================================

use crate::domain::feature::{CourseRequirementDetail, RoomFeatureDetail};
use crate::domain::types::{CompatibilityGrade, RoomSortMode};
use crate::domain::{AllocationSlot, Room};
use crate::engine::compatibility::{CompatibilityResult, CompatibilityScorer};
use crate::engine::conflict::ConflictDetector;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::time_core::TimeCore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// ConflictNote - 占用方标注
// ==========================================
/// 候选教室被占时的占用方信息 (展示"与谁冲突")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictNote {
    pub allocation_id: i64,
    pub course_code: String,
    pub section: String,
    pub schedule_day: String,
    pub schedule_time: String,
}

// ==========================================
// RankedRoom - 带标注的候选教室
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRoom {
    pub room: Room,
    pub compatibility: CompatibilityResult,
    /// 占用冲突标注 (None = 该教室在目标时段空闲)
    pub conflict: Option<ConflictNote>,
    /// 可选 = 无教室冲突 且 非强制不兼容
    pub selectable: bool,
}

// ==========================================
// ReassignmentResolver - 候选解析器
// ==========================================
pub struct ReassignmentResolver;

impl ReassignmentResolver {
    /// 为一条排课记录解析换教室候选列表
    ///
    /// # 参数
    /// - target: 要移动的排课记录 (其日/时保持不变, 只换教室)
    /// - rooms: 教室目录
    /// - allocations: 当前排课集
    /// - requirements: 目标课程的需求明细
    /// - features_by_room: 教室ID → 设备明细
    /// - sort_mode: 排序维度
    ///
    /// # 规则
    /// - 排除记录当前所在教室
    /// - 复合日码逐星期检查, 任一星期冲突即视为被占
    pub fn rank_rooms(
        target: &AllocationSlot,
        rooms: &[Room],
        allocations: &[AllocationSlot],
        requirements: &[CourseRequirementDetail],
        features_by_room: &HashMap<i64, Vec<RoomFeatureDetail>>,
        sort_mode: RoomSortMode,
    ) -> EngineResult<Vec<RankedRoom>> {
        // 目标记录自身的日/时必须可解析
        let range = TimeCore::parse_schedule_time(&target.schedule_time).map_err(|e| {
            EngineError::AllocationSlotData {
                allocation_id: target.allocation_id,
                source: e,
            }
        })?;
        let days = TimeCore::expand_day_code(&target.schedule_day).map_err(|e| {
            EngineError::AllocationSlotData {
                allocation_id: target.allocation_id,
                source: e,
            }
        })?;

        let empty_features: Vec<RoomFeatureDetail> = Vec::new();
        let mut ranked = Vec::with_capacity(rooms.len().saturating_sub(1));

        for room in rooms {
            // 排除当前教室
            if room.room_name == target.room {
                continue;
            }

            // 复合日码: 任一覆盖星期上被占即冲突
            let mut conflict = None;
            for day in &days {
                if let Some(hit) = ConflictDetector::find_room_conflict(
                    allocations,
                    &room.room_name,
                    *day,
                    range,
                    Some(target.allocation_id),
                )? {
                    conflict = Some(ConflictNote {
                        allocation_id: hit.allocation_id,
                        course_code: hit.course_code.clone(),
                        section: hit.section.clone(),
                        schedule_day: hit.schedule_day.clone(),
                        schedule_time: hit.schedule_time.clone(),
                    });
                    break;
                }
            }

            let features = features_by_room
                .get(&room.room_id)
                .unwrap_or(&empty_features);
            let compatibility = CompatibilityScorer::score_room(features, requirements);

            let selectable =
                conflict.is_none() && compatibility.grade != CompatibilityGrade::Incompatible;

            ranked.push(RankedRoom {
                room: room.clone(),
                compatibility,
                conflict,
                selectable,
            });
        }

        Self::sort_ranked(&mut ranked, sort_mode);
        Ok(ranked)
    }

    /// 候选列表排序
    ///
    /// - Compatibility: 得分降序; -1 哨兵 (无需求) 排在有分教室之后; 同分按教室名升序
    /// - Capacity: 容量降序, 同容量按教室名升序
    /// - Building: 楼栋升序, 再教室名升序
    /// - Name: 教室名升序
    fn sort_ranked(ranked: &mut [RankedRoom], sort_mode: RoomSortMode) {
        match sort_mode {
            RoomSortMode::Compatibility => {
                ranked.sort_by(|a, b| {
                    let a_sentinel = a.compatibility.is_no_requirements();
                    let b_sentinel = b.compatibility.is_no_requirements();
                    match (a_sentinel, b_sentinel) {
                        (true, false) => Ordering::Greater,
                        (false, true) => Ordering::Less,
                        _ => b
                            .compatibility
                            .score
                            .partial_cmp(&a.compatibility.score)
                            .unwrap_or(Ordering::Equal)
                            .then_with(|| a.room.room_name.cmp(&b.room.room_name)),
                    }
                });
            }
            RoomSortMode::Capacity => {
                ranked.sort_by(|a, b| {
                    b.room
                        .capacity
                        .cmp(&a.room.capacity)
                        .then_with(|| a.room.room_name.cmp(&b.room.room_name))
                });
            }
            RoomSortMode::Building => {
                ranked.sort_by(|a, b| {
                    a.room
                        .building
                        .cmp(&b.room.building)
                        .then_with(|| a.room.room_name.cmp(&b.room.room_name))
                });
            }
            RoomSortMode::Name => {
                ranked.sort_by(|a, b| a.room.room_name.cmp(&b.room.room_name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // ==========================================
    // 测试辅助函数
    // ==========================================
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

    fn make_room(id: i64, name: &str, building: &str, capacity: i32) -> Room {
        Room {
            room_id: id,
            room_name: name.to_string(),
            building: building.to_string(),
            capacity,
        }
    }

    fn requirement(tag_id: i64, tag_name: &str, mandatory: bool) -> CourseRequirementDetail {
        CourseRequirementDetail {
            course_code: "CS101".to_string(),
            tag_id,
            tag_name: tag_name.to_string(),
            is_mandatory: mandatory,
            min_quantity: 1,
        }
    }

    fn feature(room_id: i64, tag_id: i64, tag_name: &str) -> RoomFeatureDetail {
        RoomFeatureDetail {
            room_id,
            tag_id,
            tag_name: tag_name.to_string(),
            quantity: 1,
        }
    }

    #[test]
    fn test_current_room_excluded() {
        let target = make_alloc(1, "101", "M", "7:00 AM - 8:30 AM");
        let rooms = vec![
            make_room(1, "101", "主楼", 40),
            make_room(2, "102", "主楼", 40),
        ];

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &[target.clone()],
            &[],
            &HashMap::new(),
            RoomSortMode::Name,
        )
        .unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].room.room_name, "102");
    }

    #[test]
    fn test_occupied_room_annotated_and_disabled() {
        let target = make_alloc(1, "101", "M", "7:00 AM - 8:30 AM");
        // 102 在周一 7:30-9:00 被 CS202/BSIT2B 占用
        let mut occupier = make_alloc(2, "102", "M", "7:30 AM - 9:00 AM");
        occupier.course_code = "CS202".to_string();
        occupier.section = "BSIT2B".to_string();

        let rooms = vec![
            make_room(1, "101", "主楼", 40),
            make_room(2, "102", "主楼", 40),
            make_room(3, "103", "主楼", 40),
        ];
        let allocations = vec![target.clone(), occupier];

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &allocations,
            &[],
            &HashMap::new(),
            RoomSortMode::Name,
        )
        .unwrap();

        assert_eq!(ranked.len(), 2);

        let r102 = ranked.iter().find(|r| r.room.room_name == "102").unwrap();
        assert!(!r102.selectable);
        let note = r102.conflict.as_ref().unwrap();
        assert_eq!(note.course_code, "CS202");
        assert_eq!(note.section, "BSIT2B");

        let r103 = ranked.iter().find(|r| r.room.room_name == "103").unwrap();
        assert!(r103.selectable);
        assert!(r103.conflict.is_none());
    }

    #[test]
    fn test_composite_day_checks_every_weekday() {
        // 目标为 TTH; 102 仅周四被占 → 仍视为被占
        let target = make_alloc(1, "101", "TTH", "13:00 - 14:30");
        let occupier = make_alloc(2, "102", "THU", "13:00 - 14:00");

        let rooms = vec![
            make_room(1, "101", "主楼", 40),
            make_room(2, "102", "主楼", 40),
        ];
        let allocations = vec![target.clone(), occupier];

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &allocations,
            &[],
            &HashMap::new(),
            RoomSortMode::Name,
        )
        .unwrap();

        assert_eq!(ranked.len(), 1);
        assert!(!ranked[0].selectable);
        assert!(ranked[0].conflict.is_some());
    }

    #[test]
    fn test_mandatory_incompatible_never_selectable_even_if_free() {
        let target = make_alloc(1, "101", "M", "7:00 AM - 8:30 AM");
        let rooms = vec![
            make_room(1, "101", "主楼", 40),
            make_room(2, "102", "主楼", 40), // 无投影仪
            make_room(3, "103", "主楼", 40), // 有投影仪
        ];
        let requirements = vec![requirement(1, "投影仪", true)];
        let mut features = HashMap::new();
        features.insert(3, vec![feature(3, 1, "投影仪")]);

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &[target.clone()],
            &requirements,
            &features,
            RoomSortMode::Compatibility,
        )
        .unwrap();

        let r102 = ranked.iter().find(|r| r.room.room_name == "102").unwrap();
        assert!(!r102.selectable);
        assert!(r102.conflict.is_none());
        assert_eq!(
            r102.compatibility.missing_mandatory,
            vec!["投影仪".to_string()]
        );

        let r103 = ranked.iter().find(|r| r.room.room_name == "103").unwrap();
        assert!(r103.selectable);
    }

    #[test]
    fn test_sort_by_compatibility_sentinel_last() {
        let target = make_alloc(1, "999", "M", "7:00 AM - 8:30 AM");
        let rooms = vec![
            make_room(1, "A", "主楼", 40),
            make_room(2, "B", "主楼", 40),
            make_room(3, "C", "主楼", 40),
        ];
        // A 满足 2/2, B 满足 1/2; C 无设备 → 0/2
        let requirements = vec![
            requirement(1, "投影仪", false),
            requirement(2, "空调", false),
        ];
        let mut features = HashMap::new();
        features.insert(1, vec![feature(1, 1, "投影仪"), feature(1, 2, "空调")]);
        features.insert(2, vec![feature(2, 1, "投影仪")]);

        let ranked = ReassignmentResolver::rank_rooms(
            &target,
            &rooms,
            &[],
            &requirements,
            &features,
            RoomSortMode::Compatibility,
        )
        .unwrap();

        let names: Vec<&str> = ranked.iter().map(|r| r.room.room_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ranked[0].compatibility.score, 100.0);
        assert_eq!(ranked[1].compatibility.score, 50.0);
        assert_eq!(ranked[2].compatibility.score, 0.0);
    }

    #[test]
    fn test_sort_modes_capacity_building_name() {
        let target = make_alloc(1, "999", "M", "7:00 AM - 8:30 AM");
        let rooms = vec![
            make_room(1, "201", "西楼", 30),
            make_room(2, "105", "东楼", 60),
            make_room(3, "301", "东楼", 45),
        ];

        let by_capacity = ReassignmentResolver::rank_rooms(
            &target, &rooms, &[], &[], &HashMap::new(), RoomSortMode::Capacity,
        )
        .unwrap();
        let cap_names: Vec<&str> = by_capacity
            .iter()
            .map(|r| r.room.room_name.as_str())
            .collect();
        assert_eq!(cap_names, vec!["105", "301", "201"]);

        let by_building = ReassignmentResolver::rank_rooms(
            &target, &rooms, &[], &[], &HashMap::new(), RoomSortMode::Building,
        )
        .unwrap();
        let bld_names: Vec<&str> = by_building
            .iter()
            .map(|r| r.room.room_name.as_str())
            .collect();
        assert_eq!(bld_names, vec!["105", "301", "201"]);

        let by_name = ReassignmentResolver::rank_rooms(
            &target, &rooms, &[], &[], &HashMap::new(), RoomSortMode::Name,
        )
        .unwrap();
        let name_names: Vec<&str> = by_name
            .iter()
            .map(|r| r.room.room_name.as_str())
            .collect();
        assert_eq!(name_names, vec!["105", "201", "301"]);
    }
}
