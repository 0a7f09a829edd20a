// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用环境 (临时库 + AppState + 默认课表)
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use classroom_aps::app::AppState;
use classroom_aps::domain::UserAccount;
use tempfile::NamedTempFile;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 临时数据库 + 完整装配的 AppState + 一张默认未锁定课表
pub struct ApiTestEnv {
    _temp_file: NamedTempFile,
    pub state: AppState,
    pub schedule_id: i64,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let state = AppState::new(db_path).map_err(|e| format!("AppState初始化失败: {}", e))?;

        let schedule_id = state.schedule_api.create_schedule("测试课表")?;

        Ok(Self {
            _temp_file: temp_file,
            state,
            schedule_id,
        })
    }

    /// 新增教室, 返回 room_id
    pub fn add_room(&self, room_name: &str, building: &str, capacity: i32) -> i64 {
        self.state
            .room_repo
            .insert(room_name, building, capacity)
            .expect("插入教室失败")
    }

    /// 新增设备标签, 返回 tag_id
    pub fn add_tag(&self, tag_name: &str, tag_category: &str) -> i64 {
        self.state
            .feature_repo
            .insert_tag(tag_name, tag_category)
            .expect("插入设备标签失败")
    }

    /// 绑定教室设备
    pub fn add_room_feature(&self, room_id: i64, tag_id: i64, quantity: i32) {
        self.state
            .feature_repo
            .upsert_room_feature(room_id, tag_id, quantity)
            .expect("插入教室设备失败");
    }

    /// 绑定课程需求
    pub fn add_requirement(&self, course_code: &str, tag_id: i64, mandatory: bool, min_quantity: i32) {
        self.state
            .feature_repo
            .upsert_course_requirement(course_code, tag_id, mandatory, min_quantity)
            .expect("插入课程需求失败");
    }

    /// 新增账号
    pub fn add_user(&self, user_id: &str, display_name: &str, role: &str) {
        self.state
            .user_repo
            .upsert(&UserAccount {
                user_id: user_id.to_string(),
                display_name: display_name.to_string(),
                role: role.to_string(),
            })
            .expect("插入账号失败");
    }
}
