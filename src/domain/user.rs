// ==========================================
// 高校排课调度系统 - 账号领域模型
// ==========================================
// 用途: 调课申请列表的申请人姓名联查; 认证鉴权属外部协作方
// 对齐: user_account 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 账号记录 (只读联查源)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: String,      // 账号ID
    pub display_name: String, // 显示姓名
    pub role: String,         // 角色 (ADMIN / FACULTY)
}
