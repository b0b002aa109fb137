//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - Host 负责把原生 wheel / touch / pointer 事件转换为语义化输入
//! - 计时器到期同样是输入：Runtime 不感知真实时间
//! - 滚动位置变化由 Host 在每次滚动后上报

use serde::{Deserialize, Serialize};

use crate::timer::TimerId;

/// Host 向 Runtime 传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeInput {
    /// 滚轮事件
    Wheel { delta_y: f64 },

    /// 触摸开始（只记录位置，不产生滚动量）
    TouchStart { y: f64 },

    /// 触摸移动
    TouchMove { y: f64 },

    /// 外部直接推进一个阶段
    Advance,

    /// 指针进入名字区域
    PointerEnter,

    /// 指针离开名字区域
    PointerLeave,

    /// 点击名字区域
    Click,

    /// 计时器到期
    TimerFired { id: TimerId },

    /// 文档滚动位置变化
    Scrolled { offset: f64, viewport_height: f64 },
}

impl RuntimeInput {
    /// 创建滚轮输入
    pub fn wheel(delta_y: f64) -> Self {
        Self::Wheel { delta_y }
    }

    /// 创建触摸移动输入
    pub fn touch_move(y: f64) -> Self {
        Self::TouchMove { y }
    }

    /// 创建计时器到期输入
    pub fn timer(id: TimerId) -> Self {
        Self::TimerFired { id }
    }

    /// 创建滚动位置输入
    pub fn scrolled(offset: f64, viewport_height: f64) -> Self {
        Self::Scrolled {
            offset,
            viewport_height,
        }
    }

    /// 是否为滚动类输入（锁定期间需要拦截）
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Self::Wheel { .. } | Self::TouchStart { .. } | Self::TouchMove { .. }
        )
    }
}
