//! # State 模块
//!
//! 可序列化的状态与快照。
//!
//! ## 设计原则
//!
//! - 每块状态只有一个所有者：`RevealState` 属于揭示序列，
//!   `LockPhase` 属于滚动锁协调器
//! - 渲染层只读取 [`RevealSnapshot`]，不接触内部状态

use serde::{Deserialize, Serialize};

/// 揭示序列状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    /// 当前阶段（0..=max_stage），一次运行内单调不减
    pub stage: u32,
    /// 已揭示字符数（0..=total_chars）
    pub reveal_count: usize,
    /// 指针是否悬停
    pub hovered: bool,
    /// 是否被点击展开
    pub expanded_by_click: bool,
}

/// 滚动锁阶段
///
/// ```text
/// Locked ──完成信号──► Unlocking ──停顿结束──► Unlocked
/// ```
///
/// 没有回到 `Locked` 的路径。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockPhase {
    /// 拦截原生滚动，转发给阶段驱动器
    #[default]
    Locked,
    /// 揭示完成，等待停顿结束
    Unlocking,
    /// 原生滚动可用
    Unlocked,
}

impl LockPhase {
    /// 当前阶段是否拦截滚动输入
    pub fn intercepts(&self) -> bool {
        !matches!(self, Self::Unlocked)
    }
}

/// 渲染快照
///
/// 渲染层需要的全部数据。分数都在 0.0 - 1.0 之间。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSnapshot {
    pub stage: u32,
    pub reveal_count: usize,
    pub total_chars: usize,
    pub hovered: bool,
    pub expanded_by_click: bool,
    /// 是否处于逐字揭示中（点击展开或到达最大阶段）
    pub active: bool,
    /// 是否处于分离状态（悬停、点击或到达激活阶段）
    pub engaged: bool,
    /// H / I 初始分离进度
    pub engagement: f32,
    /// 全名展开进度
    pub name_expansion: f32,
    /// 已揭示的左侧名字
    pub revealed_left: String,
    /// 已揭示的右侧名字
    pub revealed_right: String,
    /// 未揭示部分的乱码
    pub cipher: String,
    pub phase: LockPhase,
    /// 第二区块是否可见
    pub section_visible: bool,
    /// 第二区块标题（可能仍在解密中）
    pub section_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_phase_intercepts() {
        assert!(LockPhase::Locked.intercepts());
        assert!(LockPhase::Unlocking.intercepts());
        assert!(!LockPhase::Unlocked.intercepts());
        assert_eq!(LockPhase::default(), LockPhase::Locked);
    }

    #[test]
    fn test_state_serialization() {
        let state = RevealState {
            stage: 3,
            reveal_count: 4,
            hovered: true,
            expanded_by_click: false,
        };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: RevealState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
