// ==========================================
// 高校排课调度系统 - 冲突检测引擎
// ==========================================
// 职责: 教室/教师/教学班三类占用冲突判定
// 红线: 无状态、无副作用; 排课集由调用方传入, 不触碰任何全局状态
// 红线: 库中脏数据 (无法解析的日/时) 必须报错, 不得伪装成无冲突
// ==========================================
// 算法: 三类检查共用同一扫描骨架, 仅相等谓词不同; O(n) 单次扫描
// (排课集规模以单张课表为界, 数百条而非百万条)
// ==========================================

use crate::domain::types::Weekday;
use crate::domain::AllocationSlot;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::time_core::{TimeCore, TimeRange};
use serde::{Deserialize, Serialize};

// ==========================================
// ConflictCheck - 单候选位的聚合判定结果
// ==========================================
// 用途: 驱动"禁用该选项"类 UI/API 决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    pub room_conflict: bool,
    pub teacher_conflict: bool,
    pub section_conflict: bool,
}

// ==========================================
// ConflictDetector - 冲突检测器
// ==========================================
pub struct ConflictDetector;

impl ConflictDetector {
    /// 教学班标识归一化
    ///
    /// 同一逻辑教学班的理论课与实验课后缀不同 (如 BSCS1A_LEC / BSCS1A_LAB),
    /// 冲突判定前剥离尾部后缀: _LAB/_LEC/_LECTURE/_LABORATORY 或空格分隔的 LAB/LEC
    pub fn section_base(section: &str) -> String {
        let upper = section.trim().to_uppercase();

        // 下划线后缀 (长后缀优先)
        for suffix in ["_LABORATORY", "_LECTURE", "_LAB", "_LEC"] {
            if let Some(stripped) = upper.strip_suffix(suffix) {
                return stripped.to_string();
            }
        }
        // 空格分隔后缀
        for suffix in [" LAB", " LEC"] {
            if let Some(stripped) = upper.strip_suffix(suffix) {
                return stripped.trim_end().to_string();
            }
        }

        upper
    }

    /// 通用扫描骨架: 返回第一条命中冲突的排课记录
    ///
    /// # 规则
    /// - 跳过 exclude_id 指定的记录 (编辑自身时排除自身)
    /// - 跳过谓词不命中的记录
    /// - 日/时字段为空白的记录视为"未落位", 不占用任何资源
    /// - 日/时字段非空但无法解析 → 报错并携带 allocation_id
    fn find_conflict<'a, P>(
        allocations: &'a [AllocationSlot],
        predicate: P,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<Option<&'a AllocationSlot>>
    where
        P: Fn(&AllocationSlot) -> bool,
    {
        for alloc in allocations {
            if Some(alloc.allocation_id) == exclude_id {
                continue;
            }
            if !predicate(alloc) {
                continue;
            }
            // 未落位的记录不占用资源
            if alloc.schedule_day.trim().is_empty() || alloc.schedule_time.trim().is_empty() {
                continue;
            }

            // 展开存储侧日码, 检查目标星期是否被覆盖
            let matches_day = TimeCore::day_matches(&alloc.schedule_day, day).map_err(|e| {
                EngineError::AllocationSlotData {
                    allocation_id: alloc.allocation_id,
                    source: e,
                }
            })?;
            if !matches_day {
                continue;
            }

            let stored_range = TimeCore::parse_schedule_time(&alloc.schedule_time).map_err(|e| {
                EngineError::AllocationSlotData {
                    allocation_id: alloc.allocation_id,
                    source: e,
                }
            })?;

            if range.overlaps(&stored_range) {
                tracing::debug!(
                    allocation_id = alloc.allocation_id,
                    room = %alloc.room,
                    section = %alloc.section,
                    "冲突命中"
                );
                return Ok(Some(alloc));
            }
        }

        Ok(None)
    }

    /// 教室占用冲突
    pub fn check_room_conflict(
        allocations: &[AllocationSlot],
        room: &str,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<bool> {
        Ok(Self::find_room_conflict(allocations, room, day, range, exclude_id)?.is_some())
    }

    /// 教室占用冲突: 返回占用方记录 (用于候选列表标注)
    pub fn find_room_conflict<'a>(
        allocations: &'a [AllocationSlot],
        room: &str,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<Option<&'a AllocationSlot>> {
        Self::find_conflict(allocations, |a| a.room == room, day, range, exclude_id)
    }

    /// 教师时间冲突
    ///
    /// 教师名为空串 = 未指派, 永不冲突
    pub fn check_teacher_conflict(
        allocations: &[AllocationSlot],
        teacher_name: &str,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<bool> {
        let teacher = teacher_name.trim();
        if teacher.is_empty() {
            return Ok(false);
        }
        Ok(Self::find_conflict(
            allocations,
            |a| a.teacher_name.trim() == teacher,
            day,
            range,
            exclude_id,
        )?
        .is_some())
    }

    /// 教学班时间冲突
    ///
    /// 同一逻辑教学班 (剥离 LEC/LAB 后缀后同名) 的理论/实验互相冲突
    pub fn check_section_conflict(
        allocations: &[AllocationSlot],
        section: &str,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<bool> {
        let base = Self::section_base(section);
        Ok(Self::find_conflict(
            allocations,
            |a| Self::section_base(&a.section) == base,
            day,
            range,
            exclude_id,
        )?
        .is_some())
    }

    /// 三类冲突聚合判定
    pub fn check_all_conflicts(
        allocations: &[AllocationSlot],
        room: &str,
        teacher_name: &str,
        section: &str,
        day: Weekday,
        range: TimeRange,
        exclude_id: Option<i64>,
    ) -> EngineResult<ConflictCheck> {
        let room_conflict = Self::check_room_conflict(allocations, room, day, range, exclude_id)?;
        let teacher_conflict =
            Self::check_teacher_conflict(allocations, teacher_name, day, range, exclude_id)?;
        let section_conflict =
            Self::check_section_conflict(allocations, section, day, range, exclude_id)?;

        Ok(ConflictCheck {
            has_conflict: room_conflict || teacher_conflict || section_conflict,
            room_conflict,
            teacher_conflict,
            section_conflict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // ==========================================
    // 测试辅助函数
    // ==========================================
    fn make_alloc(
        id: i64,
        room: &str,
        section: &str,
        teacher: &str,
        day: &str,
        time: &str,
    ) -> AllocationSlot {
        AllocationSlot {
            allocation_id: id,
            schedule_id: 1,
            room: room.to_string(),
            building: "主楼".to_string(),
            section: section.to_string(),
            teacher_name: teacher.to_string(),
            schedule_day: day.to_string(),
            schedule_time: time.to_string(),
            course_code: "CS101".to_string(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn range(start: i32, end: i32) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    // ==========================================
    // 教室冲突
    // ==========================================

    #[test]
    fn test_room_conflict_same_room_same_day_overlap() {
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A", "张老师", "M", "7:00 AM - 8:30 AM",
        )];

        // 同教室同日重叠 → 冲突
        let hit = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Monday, range(480, 570), None,
        )
        .unwrap();
        assert!(hit);

        // 换教室 → 无冲突
        let other_room = ConflictDetector::check_room_conflict(
            &allocations, "102", Weekday::Monday, range(480, 570), None,
        )
        .unwrap();
        assert!(!other_room);

        // 换日 → 无冲突
        let other_day = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Tuesday, range(480, 570), None,
        )
        .unwrap();
        assert!(!other_day);
    }

    #[test]
    fn test_room_conflict_touching_ranges_do_not_conflict() {
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A", "", "M", "7:00 AM - 8:30 AM",
        )];

        // 8:30 起始, 与 [7:00, 8:30) 端点相接 → 无冲突
        let hit = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Monday, range(510, 600), None,
        )
        .unwrap();
        assert!(!hit);
    }

    #[test]
    fn test_room_conflict_composite_stored_day() {
        // 存储侧为复合码 TTH, 候选为具体星期
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A", "", "TTH", "13:00 - 14:30",
        )];

        assert!(ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Tuesday, range(780, 840), None,
        )
        .unwrap());
        assert!(ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Thursday, range(780, 840), None,
        )
        .unwrap());
        assert!(!ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Wednesday, range(780, 840), None,
        )
        .unwrap());
    }

    #[test]
    fn test_exclude_id_skips_self() {
        let allocations = vec![make_alloc(
            7, "101", "BSCS1A", "", "M", "7:00 AM - 8:30 AM",
        )];

        // 对自身编辑场景: 排除自身后无冲突
        let hit = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Monday, range(420, 510), Some(7),
        )
        .unwrap();
        assert!(!hit);
    }

    #[test]
    fn test_unparseable_stored_time_is_error() {
        // 红线: 脏数据不得伪装成无冲突
        let allocations = vec![make_alloc(
            3, "101", "BSCS1A", "", "M", "garbage",
        )];

        let result = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Monday, range(420, 510), None,
        );
        assert!(matches!(
            result,
            Err(EngineError::AllocationSlotData { allocation_id: 3, .. })
        ));
    }

    #[test]
    fn test_blank_day_or_time_is_vacant() {
        // 未落位记录不占用资源
        let allocations = vec![
            make_alloc(1, "101", "BSCS1A", "", "", "7:00 AM - 8:30 AM"),
            make_alloc(2, "101", "BSCS1B", "", "M", ""),
        ];

        let hit = ConflictDetector::check_room_conflict(
            &allocations, "101", Weekday::Monday, range(420, 510), None,
        )
        .unwrap();
        assert!(!hit);
    }

    // ==========================================
    // 教师冲突
    // ==========================================

    #[test]
    fn test_teacher_conflict() {
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A", "张老师", "MWF", "9:00 - 10:00",
        )];

        assert!(ConflictDetector::check_teacher_conflict(
            &allocations, "张老师", Weekday::Wednesday, range(570, 630), None,
        )
        .unwrap());
        assert!(!ConflictDetector::check_teacher_conflict(
            &allocations, "李老师", Weekday::Wednesday, range(570, 630), None,
        )
        .unwrap());
    }

    #[test]
    fn test_empty_teacher_never_conflicts() {
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A", "", "M", "9:00 - 10:00",
        )];

        // 未指派教师的候选不参与教师冲突
        assert!(!ConflictDetector::check_teacher_conflict(
            &allocations, "", Weekday::Monday, range(540, 600), None,
        )
        .unwrap());
        assert!(!ConflictDetector::check_teacher_conflict(
            &allocations, "   ", Weekday::Monday, range(540, 600), None,
        )
        .unwrap());
    }

    // ==========================================
    // 教学班冲突
    // ==========================================

    #[test]
    fn test_section_base_stripping() {
        assert_eq!(ConflictDetector::section_base("BSCS1A_LEC"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("BSCS1A_LAB"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("BSCS1A_LECTURE"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("BSCS1A_LABORATORY"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("BSCS1A LAB"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("bscs1a lec"), "BSCS1A");
        assert_eq!(ConflictDetector::section_base("BSCS1A"), "BSCS1A");
    }

    #[test]
    fn test_section_conflict_lec_vs_lab() {
        // 同一逻辑教学班的理论与实验在重叠时段 → 冲突
        let allocations = vec![make_alloc(
            1, "101", "BSCS1A_LEC", "", "M", "7:00 AM - 8:30 AM",
        )];

        assert!(ConflictDetector::check_section_conflict(
            &allocations, "BSCS1A_LAB", Weekday::Monday, range(450, 540), None,
        )
        .unwrap());

        // 不同教学班 → 无冲突
        assert!(!ConflictDetector::check_section_conflict(
            &allocations, "BSCS1B", Weekday::Monday, range(450, 540), None,
        )
        .unwrap());
    }

    // ==========================================
    // 聚合判定
    // ==========================================

    #[test]
    fn test_check_all_conflicts() {
        let allocations = vec![
            make_alloc(1, "101", "BSCS1A", "张老师", "M", "7:00 AM - 8:30 AM"),
            make_alloc(2, "102", "BSCS2B", "李老师", "M", "8:00 AM - 9:30 AM"),
        ];

        // 候选: 教室101 + 李老师 + BSCS1A_LAB, 周一 8:00-9:00
        // → 教室冲突(101被1占), 教师冲突(李老师被2占), 教学班冲突(BSCS1A被1占)
        let check = ConflictDetector::check_all_conflicts(
            &allocations,
            "101",
            "李老师",
            "BSCS1A_LAB",
            Weekday::Monday,
            range(480, 540),
            None,
        )
        .unwrap();

        assert!(check.has_conflict);
        assert!(check.room_conflict);
        assert!(check.teacher_conflict);
        assert!(check.section_conflict);

        // 完全空闲的候选
        let free = ConflictDetector::check_all_conflicts(
            &allocations,
            "301",
            "王老师",
            "BSIT3C",
            Weekday::Friday,
            range(480, 540),
            None,
        )
        .unwrap();
        assert!(!free.has_conflict);
        assert!(!free.room_conflict);
        assert!(!free.teacher_conflict);
        assert!(!free.section_conflict);
    }
}
