// ==========================================
// 高校排课调度系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (冲突检测 + 调课审批)
// 说明: 引擎本体与传输层无关; 此入口做启动自检并输出库概况
// ==========================================

use classroom_aps::app::{get_default_db_path, AppState};
use classroom_aps::domain::types::RequestStatus;

fn main() {
    // 初始化日志系统
    classroom_aps::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 冲突检测与调课审批引擎", classroom_aps::APP_NAME);
    tracing::info!("系统版本: {}", classroom_aps::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    // 启动自检: 待审批申请概况
    match app_state
        .request_api
        .list_requests_by_status(RequestStatus::Pending)
    {
        Ok(pending) => {
            tracing::info!("当前待审批调课申请: {} 条", pending.len());
            for view in pending.iter().take(10) {
                tracing::info!(
                    "  [{}] {} {} 申请 {} {} → {} {}",
                    view.request.request_id,
                    view.course_code,
                    view.section,
                    view.request.original_day,
                    view.request.original_time,
                    view.request.new_day,
                    view.request.new_time,
                );
            }
        }
        Err(e) => {
            tracing::warn!("待审批申请查询失败 (库可能尚未初始化): {}", e);
            tracing::warn!("可先运行: cargo run --bin reset_and_seed_demo_db");
        }
    }

    tracing::info!("引擎就绪 (库模式使用: classroom_aps::app::AppState)");
}
