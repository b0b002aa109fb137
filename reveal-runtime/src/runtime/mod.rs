//! # Runtime 模块
//!
//! 组合揭示序列、阶段驱动器和滚动锁协调器的执行引擎。
//!
//! ## 模块结构
//!
//! - [`engine`]：输入分发与指令收集

pub mod engine;

pub use engine::RevealRuntime;
