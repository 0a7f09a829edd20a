// ==========================================
// 高校排课调度系统 - 教室兼容性评分引擎
// ==========================================
// 职责: 按课程设备需求为候选教室打分与分级
// 红线: 缺失任一强制需求 ⇒ INCOMPATIBLE, 与数值得分无关, 永不可选
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::feature::{CourseRequirementDetail, RoomFeatureDetail};
use crate::domain::types::CompatibilityGrade;
use serde::{Deserialize, Serialize};

/// "课程无需求"哨兵得分, 与合法的 0 分严格区分
pub const NO_REQUIREMENTS_SCORE: f64 = -1.0;

/// 完全匹配阈值
pub const PERFECT_SCORE_THRESHOLD: f64 = 100.0;

/// 部分匹配阈值
pub const PARTIAL_SCORE_THRESHOLD: f64 = 50.0;

// ==========================================
// CompatibilityResult - 评分结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// 百分比得分; -1.0 = 课程无需求 (得分无意义)
    pub score: f64,
    /// 分级 (展示/排序口径)
    pub grade: CompatibilityGrade,
    /// 已满足的需求标签名
    pub matched: Vec<String>,
    /// 未满足的强制需求标签名
    pub missing_mandatory: Vec<String>,
    /// 未满足的可选需求标签名
    pub missing_optional: Vec<String>,
}

impl CompatibilityResult {
    /// 得分是否为"无需求"哨兵
    pub fn is_no_requirements(&self) -> bool {
        self.score < 0.0
    }
}

// ==========================================
// CompatibilityScorer - 纯函数工具类
// ==========================================
pub struct CompatibilityScorer;

impl CompatibilityScorer {
    /// 单条需求满足判定: 同标签且数量达标
    fn requirement_satisfied(
        features: &[RoomFeatureDetail],
        requirement: &CourseRequirementDetail,
    ) -> bool {
        features
            .iter()
            .any(|f| f.tag_id == requirement.tag_id && f.quantity >= requirement.min_quantity)
    }

    /// 对候选教室按课程需求评分
    ///
    /// # 参数
    /// - features: 候选教室的设备明细 (已联标签元数据)
    /// - requirements: 课程需求明细 (已联标签元数据)
    ///
    /// # 规则
    /// - score = 需求数 > 0 ? 满足数/需求数*100 : -1 (哨兵)
    /// - 缺失强制需求 ⇒ INCOMPATIBLE; 否则按阈值分级
    pub fn score_room(
        features: &[RoomFeatureDetail],
        requirements: &[CourseRequirementDetail],
    ) -> CompatibilityResult {
        let mut matched = Vec::new();
        let mut missing_mandatory = Vec::new();
        let mut missing_optional = Vec::new();

        for req in requirements {
            if Self::requirement_satisfied(features, req) {
                matched.push(req.tag_name.clone());
            } else if req.is_mandatory {
                missing_mandatory.push(req.tag_name.clone());
            } else {
                missing_optional.push(req.tag_name.clone());
            }
        }

        let total = requirements.len();
        let score = if total > 0 {
            (matched.len() as f64 / total as f64) * 100.0
        } else {
            NO_REQUIREMENTS_SCORE
        };

        let grade = if !missing_mandatory.is_empty() {
            CompatibilityGrade::Incompatible
        } else if total == 0 {
            CompatibilityGrade::NoRequirements
        } else if score >= PERFECT_SCORE_THRESHOLD {
            CompatibilityGrade::Perfect
        } else if score >= PARTIAL_SCORE_THRESHOLD {
            CompatibilityGrade::Partial
        } else {
            CompatibilityGrade::Low
        };

        CompatibilityResult {
            score,
            grade,
            matched,
            missing_mandatory,
            missing_optional,
        }
    }
}
