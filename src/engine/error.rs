// ==========================================
// 高校排课调度系统 - 引擎层错误类型
// ==========================================
// 红线: 无法解析的输入必须显式报错, 不得静默回退为 0 点
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 时间/日码解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("时间字符串为空")]
    Empty,

    #[error("时间格式无法识别: {raw}")]
    BadFormat { raw: String },

    #[error("小时超出范围: {hour}")]
    HourOutOfRange { hour: u32 },

    #[error("分钟超出范围: {minute}")]
    MinuteOutOfRange { minute: u32 },

    #[error("时间段格式无法识别 (需要恰好一个 '-' 分隔符): {raw}")]
    BadRange { raw: String },

    #[error("时间段起止颠倒或为空区间: start={start_min}, end={end_min}")]
    InvertedRange { start_min: i32, end_min: i32 },

    #[error("无法识别的日码: {code}")]
    UnknownDayCode { code: String },
}

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 调用方直接提供的时间/日码非法
    #[error(transparent)]
    TimeParse(#[from] TimeParseError),

    /// 库中已提交排课记录的日/时字段无法解析
    /// 红线: 不可跳过该记录继续判定 (脏数据不得伪装成无冲突)
    #[error("排课记录数据无法解析: allocation_id={allocation_id}: {source}")]
    AllocationSlotData {
        allocation_id: i64,
        source: TimeParseError,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
