//! # Reveal Runtime
//!
//! About 页面名字揭示动画与滚动锁的核心运行时库。
//!
//! ## 架构概述
//!
//! `reveal-runtime` 是纯逻辑核心，不依赖任何 IO、计时器或渲染引擎。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── RuntimeInput ────────────────►│
//!   │                                   │ handle()
//!   │◄─── (Vec<Command>, InputDisposition) ──│
//!   │                                   │
//! ```
//!
//! 控制流：
//!
//! ```text
//! wheel/touch ─► ScrollLockCoordinator ─(锁定时拦截)─► ScrollStageDriver
//!                                                        │ 越过阈值
//!                                                        ▼
//!               ScrollLockCoordinator ◄─完成信号─ RevealSequencer
//!                 │ 停顿后解锁
//!                 ▼
//!               ReleaseScroll + ScrollTo(section)
//! ```
//!
//! ## 核心类型
//!
//! - [`RevealRuntime`]：执行引擎
//! - [`RevealSequencer`]：阶段 / 揭示计数状态机
//! - [`ScrollStageDriver`]：滚动量离散化
//! - [`ScrollLockCoordinator`]：滚动锁状态机
//! - [`Command`] / [`RuntimeInput`]：与 Host 之间的协议
//!
//! ## 模块结构
//!
//! - [`cipher`]：乱码生成与打字机解密文本
//! - [`command`]：Command 定义
//! - [`config`]：运行时配置
//! - [`driver`]：阶段驱动器
//! - [`error`]：错误类型定义
//! - [`input`]：RuntimeInput 定义
//! - [`lock`]：滚动锁协调器
//! - [`runtime`]：执行引擎
//! - [`sequencer`]：揭示序列
//! - [`state`]：状态与渲染快照
//! - [`timer`]：计时器句柄模型

pub mod cipher;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod lock;
pub mod runtime;
pub mod sequencer;
pub mod state;
pub mod timer;

// 重导出核心类型
pub use cipher::{CIPHER_ALPHABET, EncryptedText, scramble};
pub use command::{Command, InputDisposition, ScrollTarget};
pub use config::{EngagementCurve, LockConfig, RevealConfig, RuntimeConfig, SectionConfig};
pub use driver::{ScrollAccumulator, ScrollStageDriver, StageSink};
pub use error::{ConfigError, RevealResult};
pub use input::RuntimeInput;
pub use lock::ScrollLockCoordinator;
pub use runtime::RevealRuntime;
pub use sequencer::RevealSequencer;
pub use state::{LockPhase, RevealSnapshot, RevealState};
pub use timer::{Outbox, TimerId, TimerKind, TimerSlot};
