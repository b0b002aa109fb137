//! # Command 模块
//!
//! Runtime 向 Host 发出的指令。
//!
//! Runtime 不持有计时器，也不直接操作文档滚动；它只描述"需要发生什么"，
//! 由 Host 执行并把结果（计时器触发、滚动位置）以 `RuntimeInput` 的形式送回。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::timer::{TimerId, TimerKind};

/// 滚动目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScrollTarget {
    /// 绝对偏移
    Offset(f64),
    /// 命名区块的顶部
    Section(String),
}

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 启动一次性计时器，到期后 Host 回传 `TimerFired { id }`
    StartTimer {
        id: TimerId,
        kind: TimerKind,
        delay: Duration,
    },

    /// 取消计时器
    ///
    /// Host 取消失败（已经触发）也没关系，Runtime 会忽略过期的 id。
    CancelTimer { id: TimerId },

    /// 禁止文档原生滚动
    SuppressScroll,

    /// 恢复文档原生滚动
    ReleaseScroll,

    /// 平滑滚动到目标
    ScrollTo(ScrollTarget),

    /// 设置第二区块可见性（仅透明度，不卸载）
    SetSectionVisible(bool),

    /// 揭示完成通知（每次激活最多一次）
    RevealCompleted,
}

/// Host 对本次输入默认行为的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputDisposition {
    /// 已被拦截，Host 必须阻止默认滚动
    Intercepted,
    /// 交给 Host 原生处理
    Native,
}

impl InputDisposition {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Intercepted)
    }
}
