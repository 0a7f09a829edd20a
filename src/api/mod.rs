// ==========================================
// 高校排课调度系统 - API层
// ==========================================
// 职责: 业务接口 (数据装载 + 引擎调用 + 守卫 + 通知)
// ==========================================

pub mod conflict_api;
pub mod error;
pub mod request_api;
pub mod schedule_api;

pub use conflict_api::ConflictApi;
pub use error::{ApiError, ApiResult};
pub use request_api::{CreateChangeRequestInput, RequestApi, RequestDecision};
pub use schedule_api::ScheduleApi;
