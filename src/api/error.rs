// ==========================================
// 高校排课调度系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/Engine错误为用户友好的错误消息
// 红线: 守卫类错误 (锁定/状态/冲突) 必须原样上报, 不得自动纠正
// ==========================================

use crate::engine::error::{EngineError, TimeParseError};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务守卫错误
    // ==========================================
    /// 课表锁定守卫: 创建申请被拒, 不落任何记录
    #[error("课表已锁定, 暂不接受新的调课申请: schedule_id={0}")]
    ScheduleLocked(i64),

    /// 状态机守卫: 终态申请不可再审批
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 审批复核守卫: 目标时段此刻已不再可用
    #[error("目标时段已不再可用: {0}")]
    SlotConflict(String),

    // ==========================================
    // 输入与数据质量错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("时间/日码解析失败: {0}")]
    TimeParse(#[from] TimeParseError),

    /// 库中已提交排课记录的日/时字段脏数据
    #[error("排课数据质量错误: {0}")]
    DataQuality(String),

    // ==========================================
    // 数据访问错误 (底层存储故障, 原样透传)
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 并发控制: 版本号不符 = 审批期间排课被他人改写 → "时段不再可用"
            RepositoryError::OptimisticLockFailure {
                allocation_id,
                expected,
                actual,
            } => ApiError::SlotConflict(format!(
                "排课记录{}在审批期间已被其他操作改写 (期望revision={}, 实际revision={})",
                allocation_id, expected, actual
            )),
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }

            // 数据库错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ValidationError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("外键约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::ValidationError(format!("字段{}错误: {}", field, message))
            }

            // 通用错误
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TimeParse(e) => ApiError::TimeParse(e),
            EngineError::AllocationSlotData { .. } => ApiError::DataQuality(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimistic_lock_maps_to_slot_conflict() {
        let repo_err = RepositoryError::OptimisticLockFailure {
            allocation_id: 42,
            expected: 1,
            actual: 2,
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::SlotConflict(msg) => {
                assert!(msg.contains("42"));
            }
            _ => panic!("Expected SlotConflict"),
        }
    }

    #[test]
    fn test_not_found_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "ChangeRequest".to_string(),
            id: "R001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("ChangeRequest"));
                assert!(msg.contains("R001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_engine_time_parse_conversion() {
        let engine_err = EngineError::TimeParse(TimeParseError::Empty);
        let api_err: ApiError = engine_err.into();
        assert!(matches!(api_err, ApiError::TimeParse(TimeParseError::Empty)));
    }
}
