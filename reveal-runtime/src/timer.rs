//! # Timer 模块
//!
//! 计时器句柄模型。
//!
//! 每个需要等待的组件持有一个 [`TimerSlot`]，里面记录当前挂起的 [`TimerId`]。
//! 启动、取消都以 [`Command`] 的形式发给 Host；Host 回传的 `TimerFired`
//! 只有在 id 与槽位中记录的一致时才会生效，过期的 id 一律忽略。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::command::Command;

/// 计时器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// 计时器用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// 逐字揭示
    RevealTick,
    /// 揭示完成后的解锁停顿
    SettleDelay,
    /// 回顶吸附冷却
    SnapCooldown,
    /// 区块标题解密
    TitleTick,
}

/// 指令发件箱
///
/// 组件把产生的指令写入这里；同时负责分配单调递增的计时器 ID。
#[derive(Debug, Default)]
pub struct Outbox {
    next_timer: u64,
    commands: Vec<Command>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条指令
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// 取出所有指令
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// 当前缓存的指令
    pub fn pending(&self) -> &[Command] {
        &self.commands
    }

    fn allocate(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId(self.next_timer)
    }
}

/// 单个计时器槽位
#[derive(Debug, Clone)]
pub struct TimerSlot {
    kind: TimerKind,
    armed: Option<TimerId>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind) -> Self {
        Self { kind, armed: None }
    }

    /// 是否有挂起的计时器
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// 当前挂起的计时器 ID
    pub fn armed_id(&self) -> Option<TimerId> {
        self.armed
    }

    /// 启动计时器（若已有挂起的计时器，先取消）
    pub fn arm(&mut self, delay: Duration, outbox: &mut Outbox) -> TimerId {
        self.cancel(outbox);
        let id = outbox.allocate();
        self.armed = Some(id);
        outbox.push(Command::StartTimer {
            id,
            kind: self.kind,
            delay,
        });
        id
    }

    /// 取消挂起的计时器
    pub fn cancel(&mut self, outbox: &mut Outbox) {
        if let Some(id) = self.armed.take() {
            outbox.push(Command::CancelTimer { id });
        }
    }

    /// 认领一次到期事件
    ///
    /// 返回 `true` 表示这是本槽位当前挂起的计时器，槽位随之清空。
    pub fn claim(&mut self, id: TimerId) -> bool {
        if self.armed == Some(id) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_claim() {
        let mut outbox = Outbox::new();
        let mut slot = TimerSlot::new(TimerKind::RevealTick);

        let id = slot.arm(Duration::from_millis(80), &mut outbox);
        assert!(slot.is_armed());
        assert_eq!(
            outbox.drain(),
            vec![Command::StartTimer {
                id,
                kind: TimerKind::RevealTick,
                delay: Duration::from_millis(80)
            }]
        );

        assert!(!slot.claim(TimerId(id.0 + 100)));
        assert!(slot.claim(id));
        assert!(!slot.is_armed());
        // 同一个 id 不能认领两次
        assert!(!slot.claim(id));
    }

    #[test]
    fn test_rearm_cancels_previous() {
        let mut outbox = Outbox::new();
        let mut slot = TimerSlot::new(TimerKind::SettleDelay);

        let first = slot.arm(Duration::from_millis(400), &mut outbox);
        let second = slot.arm(Duration::from_millis(400), &mut outbox);
        assert_ne!(first, second);

        let commands = outbox.drain();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1], Command::CancelTimer { id: first });

        // 被取消的计时器即使到期也无效
        assert!(!slot.claim(first));
        assert!(slot.claim(second));
    }

    #[test]
    fn test_cancel_idle_slot_is_noop() {
        let mut outbox = Outbox::new();
        let mut slot = TimerSlot::new(TimerKind::SnapCooldown);
        slot.cancel(&mut outbox);
        assert!(outbox.pending().is_empty());
    }
}
