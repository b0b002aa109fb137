//! # Lock 模块
//!
//! 滚动锁协调器。
//!
//! ## 状态转换
//!
//! ```text
//! Locked    -> 拦截 wheel / touch，转发给阶段驱动器，阻止默认滚动
//! Unlocking -> 揭示完成后的停顿，仍然拦截
//! Unlocked  -> 原生滚动；监听滚动位置，控制第二区块可见性和回顶吸附
//! ```
//!
//! 文档级滚动抑制是进程内唯一的开关，只有这里会发出 `SuppressScroll` /
//! `ReleaseScroll`，并且 [`dispose`](ScrollLockCoordinator::dispose) 在任何阶段都会释放。

use tracing::{debug, info};

use crate::command::{Command, ScrollTarget};
use crate::config::LockConfig;
use crate::state::LockPhase;
use crate::timer::{Outbox, TimerId, TimerKind, TimerSlot};

/// 滚动锁协调器
#[derive(Debug)]
pub struct ScrollLockCoordinator {
    config: LockConfig,
    phase: LockPhase,
    /// 是否持有文档滚动抑制
    suppressed: bool,
    settle: TimerSlot,
    cooldown: TimerSlot,
    last_offset: Option<f64>,
    section_visible: bool,
}

impl ScrollLockCoordinator {
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            phase: LockPhase::Locked,
            suppressed: false,
            settle: TimerSlot::new(TimerKind::SettleDelay),
            cooldown: TimerSlot::new(TimerKind::SnapCooldown),
            last_offset: None,
            section_visible: false,
        }
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn section_visible(&self) -> bool {
        self.section_visible
    }

    /// 当前是否拦截滚动输入
    pub fn intercepts(&self) -> bool {
        self.phase.intercepts()
    }

    /// 挂载：进入 Locked 并获取滚动抑制
    pub fn mount(&mut self, outbox: &mut Outbox) {
        if self.phase == LockPhase::Locked && !self.suppressed {
            self.suppressed = true;
            outbox.push(Command::SuppressScroll);
            outbox.push(Command::SetSectionVisible(false));
            debug!("滚动锁已挂载");
        }
    }

    /// 揭示全部完成（阶段已到顶）：进入 Unlocking，安排停顿
    ///
    /// 只在 Locked 阶段生效，返回是否发生了转换。由引擎在阶段与揭示都满足时调用。
    pub fn on_reveal_complete(&mut self, outbox: &mut Outbox) -> bool {
        if self.phase != LockPhase::Locked {
            return false;
        }
        self.phase = LockPhase::Unlocking;
        self.settle.arm(self.config.settle_delay(), outbox);
        info!(
            settle_delay_ms = self.config.settle_delay_ms,
            "揭示完成，准备解锁"
        );
        true
    }

    /// 该计时器是否属于本协调器
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.settle.armed_id() == Some(id) || self.cooldown.armed_id() == Some(id)
    }

    /// 处理计时器到期，返回是否被认领
    pub fn on_timer(&mut self, id: TimerId, outbox: &mut Outbox) -> bool {
        if self.settle.claim(id) {
            self.unlock(outbox);
            true
        } else if self.cooldown.claim(id) {
            debug!("回顶吸附冷却结束");
            true
        } else {
            false
        }
    }

    fn unlock(&mut self, outbox: &mut Outbox) {
        self.phase = LockPhase::Unlocked;
        self.release(outbox);
        outbox.push(Command::ScrollTo(ScrollTarget::Section(
            self.config.target_section.clone(),
        )));
        info!(section = %self.config.target_section, "滚动已解锁");
    }

    /// 处理滚动位置变化
    ///
    /// 只在 Unlocked 阶段生效。可见性发生变化时返回新的可见性。
    pub fn on_scrolled(
        &mut self,
        offset: f64,
        viewport_height: f64,
        outbox: &mut Outbox,
    ) -> Option<bool> {
        if self.phase != LockPhase::Unlocked
            || !offset.is_finite()
            || !viewport_height.is_finite()
            || viewport_height <= 0.0
        {
            return None;
        }

        let mut changed = None;
        let visible = offset > viewport_height * self.config.section_reveal_ratio;
        if visible != self.section_visible {
            self.section_visible = visible;
            outbox.push(Command::SetSectionVisible(visible));
            changed = Some(visible);
        }

        if let Some(last) = self.last_offset
            && offset < last
            && offset > 0.0
            && offset < viewport_height * self.config.snap_ratio
            && !self.cooldown.is_armed()
        {
            outbox.push(Command::ScrollTo(ScrollTarget::Offset(0.0)));
            self.cooldown.arm(self.config.snap_cooldown(), outbox);
            info!(offset = offset, "向上滚动接近顶部，吸附回顶");
        }

        self.last_offset = Some(offset);
        changed
    }

    /// 释放滚动抑制（幂等）
    fn release(&mut self, outbox: &mut Outbox) {
        if self.suppressed {
            self.suppressed = false;
            outbox.push(Command::ReleaseScroll);
        }
    }

    /// 卸载：取消所有计时器并释放滚动抑制
    pub fn dispose(&mut self, outbox: &mut Outbox) {
        self.settle.cancel(outbox);
        self.cooldown.cancel(outbox);
        self.release(outbox);
    }
}
