//! # Error 模块
//!
//! 定义 reveal-runtime 中使用的错误类型。
//!
//! 运行时本身没有输入错误：越界的阶段推进、过期的计时器都按饱和/忽略处理。
//! 唯一会失败的是配置校验。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 名字为空
    #[error("名字 '{field}' 不能为空")]
    EmptyName { field: &'static str },

    /// 最大阶段无效
    #[error("max_stage 必须大于 0")]
    InvalidMaxStage,

    /// 激活阶段超出范围
    #[error("activation_stage 必须在 1..={max_stage} 之间，实际为 {actual}")]
    InvalidActivationStage { actual: u32, max_stage: u32 },

    /// 时长为零
    #[error("'{field}' 必须大于 0 毫秒")]
    ZeroDuration { field: &'static str },

    /// 阈值无效
    #[error("阈值 '{field}' 无效: {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    /// 比例超出范围
    #[error("比例 '{field}' 必须在 (0, 1] 之间，实际为 {value}")]
    InvalidRatio { field: &'static str, value: f64 },

    /// 目标区块为空
    #[error("target_section 不能为空")]
    EmptyTargetSection,
}

/// Result 类型别名
pub type RevealResult<T> = Result<T, ConfigError>;
