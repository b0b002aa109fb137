//! # Host 层
//!
//! About 页面名字揭示的宿主层实现，使用 tokio 驱动计时器。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 计时器调度（tokio 任务，可取消，丢弃时全部终止）
//! - 文档滚动与滚动抑制
//! - 输入采集与转换
//! - 将 Runtime 的 Command 转换为实际效果
//! - 把快照映射为布局参数
//!
//! Host 层不包含揭示逻辑，只负责执行 Runtime 发出的 Command。

pub mod config;
pub mod document;
pub mod error;
pub mod executor;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod trace;

pub use config::{AppConfig, DebugConfig, DocumentConfig, LayoutConfig};
pub use document::{DocumentState, ScrollSuppression, ScrollSurface, SimulatedDocument};
pub use error::{HostError, HostResult};
pub use executor::CommandExecutor;
pub use input::{HostEvent, InputTranslator, Translated};
pub use renderer::{BackgroundParallax, NameFrame, describe};
pub use scheduler::TimerScheduler;
pub use session::{AboutSession, FrameRecord, MAX_FEEDBACK_ROUNDS, ReplayReport};
pub use trace::{InputTrace, TimedEvent};

// 重新导出 reveal-runtime 的常用类型
pub use reveal_runtime;
