//! # Error 模块
//!
//! 定义 Host 层的错误类型。

use std::path::PathBuf;

use reveal_runtime::ConfigError;
use thiserror::Error;

/// Host 层错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 运行时配置无效
    #[error("运行时配置无效: {0}")]
    Runtime(#[from] ConfigError),

    /// 配置校验失败
    #[error("配置验证失败: {0}")]
    Validation(String),

    /// 文件读写失败
    #[error("读写 {path:?} 失败: {message}")]
    Io { path: PathBuf, message: String },

    /// JSON 解析失败
    #[error("解析 {path:?} 失败: {message}")]
    Parse { path: PathBuf, message: String },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialization(String),

    /// 输入轨迹无效
    #[error("输入轨迹第 {index} 个事件无效: {message}")]
    InvalidTrace { index: usize, message: String },
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
