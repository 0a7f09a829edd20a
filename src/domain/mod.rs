// ==========================================
// 高校排课调度系统 - 领域层
// ==========================================
// 职责: 实体与类型定义, 无业务逻辑
// ==========================================

pub mod allocation;
pub mod change_request;
pub mod feature;
pub mod notification;
pub mod types;
pub mod user;

pub use allocation::{AllocationSlot, Room, Schedule};
pub use change_request::{ChangeRequest, ChangeRequestView};
pub use feature::{
    CourseRequirement, CourseRequirementDetail, FeatureTag, RoomFeature, RoomFeatureDetail,
};
pub use notification::NotificationRecord;
pub use user::UserAccount;
