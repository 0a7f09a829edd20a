// ==========================================
// 高校排课调度系统 - 设备需求领域模型
// ==========================================
// 用途: 教室兼容性评分输入
// 对齐: feature_tag / room_feature / course_requirement 表
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// FeatureTag - 设备/设施标签
// ==========================================
// 管理端维护, 引擎运行期间不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTag {
    pub tag_id: i64,          // 标签ID
    pub tag_name: String,     // 标签名 (如 "投影仪")
    pub tag_category: String, // 类别 (如 "多媒体")
}

// ==========================================
// RoomFeature - 教室-标签关联
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomFeature {
    pub room_id: i64,
    pub tag_id: i64,
    pub quantity: i32, // 数量
}

// ==========================================
// CourseRequirement - 课程-标签需求
// ==========================================
// 红线: is_mandatory 为决定性标志, 强制需求不满足的教室永不可选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRequirement {
    pub course_code: String,
    pub tag_id: i64,
    pub is_mandatory: bool, // 强制需求标志
    pub min_quantity: i32,  // 最小数量
}

// ==========================================
// 读取时联表明细 (标签元数据已联上)
// ==========================================

/// 教室设备明细 (room_feature ⋈ feature_tag)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomFeatureDetail {
    pub room_id: i64,
    pub tag_id: i64,
    pub tag_name: String,
    pub quantity: i32,
}

/// 课程需求明细 (course_requirement ⋈ feature_tag)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRequirementDetail {
    pub course_code: String,
    pub tag_id: i64,
    pub tag_name: String,
    pub is_mandatory: bool,
    pub min_quantity: i32,
}
