// ==========================================
// 高校排课调度系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有仓储共享同一条已统一 PRAGMA 的连接
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ConflictApi, RequestApi, ScheduleApi};
use crate::config::ConfigManager;
use crate::db::{open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{
    AllocationRepository, ChangeRequestRepository, FeatureRepository, NotificationRepository,
    RoomRepository, ScheduleRepository, UserRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 冲突查询API
    pub conflict_api: Arc<ConflictApi>,

    /// 调课申请API
    pub request_api: Arc<RequestApi>,

    /// 课表管理API
    pub schedule_api: Arc<ScheduleApi>,

    /// 课表仓储
    pub schedule_repo: Arc<ScheduleRepository>,

    /// 排课记录仓储
    pub allocation_repo: Arc<AllocationRepository>,

    /// 教室目录仓储
    pub room_repo: Arc<RoomRepository>,

    /// 设备需求仓储
    pub feature_repo: Arc<FeatureRepository>,

    /// 调课申请仓储
    pub request_repo: Arc<ChangeRequestRepository>,

    /// 通知仓储（审计追踪用）
    pub notification_repo: Arc<NotificationRepository>,

    /// 账号仓储（联查源维护用）
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并应用统一 PRAGMA
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        // Best-effort: schema 版本只做提示, 不阻断启动
        match read_schema_version(&conn) {
            Ok(Some(version)) if version != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "schema_version={} 与代码期望的 {} 不一致, 请确认数据库已迁移",
                    version,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(None) => {
                tracing::warn!("数据库缺少 schema_version 表, 可能是未初始化的库");
            }
            Ok(Some(_)) => {}
            Err(e) => {
                tracing::warn!("schema_version 读取失败(将继续启动): {}", e);
            }
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let schedule_repo = Arc::new(ScheduleRepository::from_connection(conn.clone()));
        let allocation_repo = Arc::new(AllocationRepository::from_connection(conn.clone()));
        let room_repo = Arc::new(RoomRepository::from_connection(conn.clone()));
        let feature_repo = Arc::new(FeatureRepository::from_connection(conn.clone()));
        let request_repo = Arc::new(ChangeRequestRepository::from_connection(conn.clone()));
        let notification_repo = Arc::new(NotificationRepository::from_connection(conn.clone()));
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化配置层
        // ==========================================
        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let conflict_api = Arc::new(ConflictApi::new(
            allocation_repo.clone(),
            room_repo.clone(),
            feature_repo.clone(),
            config,
        ));
        let request_api = Arc::new(RequestApi::new(
            schedule_repo.clone(),
            allocation_repo.clone(),
            request_repo.clone(),
            notification_repo.clone(),
        ));
        let schedule_api = Arc::new(ScheduleApi::new(
            schedule_repo.clone(),
            notification_repo.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conflict_api,
            request_api,
            schedule_api,
            schedule_repo,
            allocation_repo,
            room_repo,
            feature_repo,
            request_repo,
            notification_repo,
            user_repo,
        })
    }
}
