//! # Engine 模块
//!
//! About 页面核心执行引擎。
//!
//! ## 执行模型
//!
//! ```text
//! handle(input) -> (Vec<Command>, InputDisposition)
//! ```
//!
//! 1. 锁定期间的滚动类输入被拦截，交给阶段驱动器
//! 2. 指针输入直接改变揭示序列
//! 3. 计时器到期按 id 分发给所属组件，过期的 id 被丢弃
//! 4. 阶段到顶且揭示完成时通知滚动锁协调器进入解锁流程
//! 5. 返回本次产生的全部指令和默认行为处理方式

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::cipher::EncryptedText;
use crate::command::{Command, InputDisposition};
use crate::config::RuntimeConfig;
use crate::driver::ScrollStageDriver;
use crate::error::RevealResult;
use crate::input::RuntimeInput;
use crate::lock::ScrollLockCoordinator;
use crate::sequencer::RevealSequencer;
use crate::state::{LockPhase, RevealSnapshot};
use crate::timer::{Outbox, TimerId, TimerKind, TimerSlot};

/// About 页面执行引擎
///
/// # 使用示例
///
/// ```ignore
/// let mut runtime = RevealRuntime::new(RuntimeConfig::default())?;
/// host.execute_all(runtime.mount());
///
/// loop {
///     let (commands, disposition) = runtime.handle(input);
///     if disposition.prevents_default() {
///         event.prevent_default();
///     }
///     host.execute_all(commands);
/// }
/// ```
#[derive(Debug)]
pub struct RevealRuntime {
    config: RuntimeConfig,
    sequencer: RevealSequencer,
    driver: ScrollStageDriver,
    lock: ScrollLockCoordinator,
    /// 第二区块标题
    title: EncryptedText,
    title_tick: TimerSlot,
    title_text: String,
    title_started: bool,
    rng: StdRng,
    outbox: Outbox,
    disposed: bool,
}

impl RevealRuntime {
    /// 创建新的引擎实例，使用系统熵作为随机源
    pub fn new(config: RuntimeConfig) -> RevealResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// 使用固定种子创建（乱码可复现）
    pub fn with_seed(config: RuntimeConfig, seed: u64) -> RevealResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: RuntimeConfig, mut rng: StdRng) -> RevealResult<Self> {
        config.validate()?;

        let sequencer_rng = StdRng::seed_from_u64(rng.r#gen());
        let title = EncryptedText::with_interval(
            config.section.title.clone(),
            config.section.title_interval(),
        );
        let title_text = title.output(&mut rng);

        Ok(Self {
            sequencer: RevealSequencer::new(config.reveal.clone(), sequencer_rng),
            driver: ScrollStageDriver::new(config.reveal.stage_threshold),
            lock: ScrollLockCoordinator::new(config.lock.clone()),
            title,
            title_tick: TimerSlot::new(TimerKind::TitleTick),
            title_text,
            title_started: false,
            rng,
            outbox: Outbox::new(),
            disposed: false,
            config,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &RevealSequencer {
        &self.sequencer
    }

    pub fn driver(&self) -> &ScrollStageDriver {
        &self.driver
    }

    pub fn lock(&self) -> &ScrollLockCoordinator {
        &self.lock
    }

    pub fn phase(&self) -> LockPhase {
        self.lock.phase()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// 挂载：获取滚动抑制
    pub fn mount(&mut self) -> Vec<Command> {
        if !self.disposed {
            self.lock.mount(&mut self.outbox);
        }
        self.outbox.drain()
    }

    /// 核心驱动函数
    ///
    /// # 返回
    ///
    /// - `Vec<Command>`: 本次输入产生的所有指令
    /// - `InputDisposition`: Host 是否需要阻止本次事件的默认行为
    pub fn handle(&mut self, input: RuntimeInput) -> (Vec<Command>, InputDisposition) {
        if self.disposed {
            return (Vec::new(), InputDisposition::Native);
        }
        trace!(input = ?input, "处理输入");

        let intercepted = input.is_motion() && self.lock.intercepts();
        let mut completed = false;

        match input {
            RuntimeInput::Wheel { delta_y } => {
                if intercepted {
                    self.driver
                        .on_wheel(delta_y, &mut self.sequencer, &mut self.outbox);
                }
            }
            RuntimeInput::TouchStart { y } => {
                if intercepted {
                    self.driver.on_touch_start(y);
                }
            }
            RuntimeInput::TouchMove { y } => {
                if intercepted {
                    self.driver.on_motion(y, &mut self.sequencer, &mut self.outbox);
                }
            }
            RuntimeInput::Advance => {
                self.driver.advance_stage(&mut self.sequencer, &mut self.outbox);
            }
            RuntimeInput::PointerEnter => self.sequencer.pointer_enter(&mut self.outbox),
            RuntimeInput::PointerLeave => self.sequencer.pointer_leave(&mut self.outbox),
            RuntimeInput::Click => self.sequencer.click(&mut self.outbox),
            RuntimeInput::TimerFired { id } => {
                completed = self.route_timer(id);
            }
            RuntimeInput::Scrolled {
                offset,
                viewport_height,
            } => {
                if let Some(true) = self
                    .lock
                    .on_scrolled(offset, viewport_height, &mut self.outbox)
                {
                    self.start_title();
                }
            }
        }

        if completed {
            self.outbox.push(Command::RevealCompleted);
        }
        // 阶段到顶且全部揭示才解锁，两者先后顺序不限
        if self.sequencer.at_max_stage() && self.sequencer.is_complete() {
            self.lock.on_reveal_complete(&mut self.outbox);
        }

        let disposition = if intercepted {
            InputDisposition::Intercepted
        } else {
            InputDisposition::Native
        };
        (self.outbox.drain(), disposition)
    }

    /// 按 id 分发计时器，返回揭示是否在本次完成
    fn route_timer(&mut self, id: TimerId) -> bool {
        if self.sequencer.owns_timer(id) {
            return self.sequencer.on_tick(id, &mut self.outbox);
        }
        if self.lock.on_timer(id, &mut self.outbox) {
            return false;
        }
        if self.title_tick.claim(id) {
            if self.title.tick() {
                self.title_tick.arm(self.title.interval(), &mut self.outbox);
            }
            self.title_text = self.title.output(&mut self.rng);
            return false;
        }
        debug!(id = id.0, "忽略过期的计时器");
        false
    }

    /// 第二区块首次出现时开始解密标题
    fn start_title(&mut self) {
        if self.title_started {
            return;
        }
        self.title_started = true;
        self.title.reset();
        self.title_text = self.title.output(&mut self.rng);
        self.title_tick.arm(self.title.interval(), &mut self.outbox);
    }

    /// 渲染快照
    pub fn snapshot(&self) -> RevealSnapshot {
        let seq = &self.sequencer;
        let state = seq.state();
        RevealSnapshot {
            stage: state.stage,
            reveal_count: state.reveal_count,
            total_chars: seq.total_chars(),
            hovered: state.hovered,
            expanded_by_click: state.expanded_by_click,
            active: seq.is_active(),
            engaged: seq.is_engaged(),
            engagement: seq.engagement_fraction(),
            name_expansion: seq.name_expansion_fraction(),
            revealed_left: seq.revealed_left(),
            revealed_right: seq.revealed_right(),
            cipher: seq.cipher_text().to_string(),
            phase: self.lock.phase(),
            section_visible: self.lock.section_visible(),
            section_title: self.title_text.clone(),
        }
    }

    /// 卸载：取消所有计时器并释放滚动抑制
    ///
    /// 可重复调用；第二次起不产生任何指令。
    pub fn dispose(&mut self) -> Vec<Command> {
        if !self.disposed {
            self.sequencer.reset(&mut self.outbox);
            self.title_tick.cancel(&mut self.outbox);
            self.lock.dispose(&mut self.outbox);
            self.disposed = true;
            debug!("引擎已卸载");
        }
        self.outbox.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ScrollTarget;

    fn runtime() -> RevealRuntime {
        let mut rt = RevealRuntime::with_seed(RuntimeConfig::default(), 42).unwrap();
        rt.mount();
        rt
    }

    /// 最近一次启动的指定类型计时器
    fn started(commands: &[Command], kind: TimerKind) -> Option<TimerId> {
        commands.iter().rev().find_map(|cmd| match cmd {
            Command::StartTimer { id, kind: k, .. } if *k == kind => Some(*id),
            _ => None,
        })
    }

    /// 把滚轮输入推进到最大阶段，返回最后一批指令
    fn scroll_to_max(rt: &mut RevealRuntime) -> Vec<Command> {
        let mut last = Vec::new();
        for _ in 0..5 {
            let (commands, disposition) = rt.handle(RuntimeInput::wheel(41.0));
            assert_eq!(disposition, InputDisposition::Intercepted);
            last = commands;
        }
        last
    }

    #[test]
    fn test_mount_commands() {
        let mut rt = RevealRuntime::with_seed(RuntimeConfig::default(), 1).unwrap();
        insta::assert_debug_snapshot!(rt.mount(), @r"
        [
            SuppressScroll,
            SetSectionVisible(
                false,
            ),
        ]
        ");
        assert!(rt.mount().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RuntimeConfig::default();
        config.reveal.max_stage = 0;
        assert!(RevealRuntime::new(config).is_err());
    }

    #[test]
    fn test_full_scroll_reveal_scenario() {
        let mut rt = runtime();

        let commands = scroll_to_max(&mut rt);
        assert_eq!(rt.sequencer().stage(), 5);
        assert!(rt.sequencer().is_active());

        let mut tick = started(&commands, TimerKind::RevealTick).expect("应当开始揭示");
        let mut completions = 0;
        let mut settle = None;
        for _ in 0..12 {
            let (commands, _) = rt.handle(RuntimeInput::timer(tick));
            completions += commands
                .iter()
                .filter(|c| **c == Command::RevealCompleted)
                .count();
            if let Some(next) = started(&commands, TimerKind::RevealTick) {
                tick = next;
            }
            settle = settle.or(started(&commands, TimerKind::SettleDelay));
        }

        assert_eq!(rt.sequencer().reveal_count(), 12);
        assert_eq!(completions, 1);
        assert_eq!(rt.phase(), LockPhase::Unlocking);

        let (commands, _) = rt.handle(RuntimeInput::timer(settle.unwrap()));
        assert_eq!(rt.phase(), LockPhase::Unlocked);
        assert_eq!(
            commands,
            vec![
                Command::ReleaseScroll,
                Command::ScrollTo(ScrollTarget::Section("about-details".to_string()))
            ]
        );

        let snapshot = rt.snapshot();
        assert_eq!(snapshot.revealed_left, "Haitham");
        assert_eq!(snapshot.revealed_right, "Iswed");
        assert_eq!(snapshot.cipher, "");
        assert_eq!(snapshot.name_expansion, 1.0);
    }

    #[test]
    fn test_wheel_native_after_unlock() {
        let mut rt = runtime();
        let commands = scroll_to_max(&mut rt);
        let mut tick = started(&commands, TimerKind::RevealTick).unwrap();
        let mut settle = None;
        while settle.is_none() {
            let (commands, _) = rt.handle(RuntimeInput::timer(tick));
            tick = started(&commands, TimerKind::RevealTick).unwrap_or(tick);
            settle = started(&commands, TimerKind::SettleDelay);
        }
        rt.handle(RuntimeInput::timer(settle.unwrap()));

        let (commands, disposition) = rt.handle(RuntimeInput::wheel(41.0));
        assert_eq!(disposition, InputDisposition::Native);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_stale_timer_ignored() {
        let mut rt = runtime();
        let (commands, _) = rt.handle(RuntimeInput::timer(TimerId(999)));
        assert!(commands.is_empty());
        assert_eq!(rt.sequencer().reveal_count(), 0);
    }

    #[test]
    fn test_click_expand_collapse_before_tick() {
        let mut rt = runtime();
        rt.handle(RuntimeInput::PointerEnter);
        let (commands, disposition) = rt.handle(RuntimeInput::Click);
        assert_eq!(disposition, InputDisposition::Native);
        let tick = started(&commands, TimerKind::RevealTick).unwrap();

        let (commands, _) = rt.handle(RuntimeInput::Click);
        assert_eq!(commands, vec![Command::CancelTimer { id: tick }]);

        let (commands, _) = rt.handle(RuntimeInput::timer(tick));
        assert!(!commands.contains(&Command::RevealCompleted));
        assert_eq!(rt.sequencer().reveal_count(), 0);
        assert_eq!(rt.phase(), LockPhase::Locked);
    }

    /// 点击展开并揭示完毕，返回揭示期间的全部指令
    fn click_reveal(rt: &mut RevealRuntime) -> Vec<Command> {
        rt.handle(RuntimeInput::PointerEnter);
        let (commands, _) = rt.handle(RuntimeInput::Click);
        let mut tick = started(&commands, TimerKind::RevealTick).unwrap();
        let mut all = commands;
        while rt.sequencer().reveal_count() < 12 {
            let (commands, _) = rt.handle(RuntimeInput::timer(tick));
            tick = started(&commands, TimerKind::RevealTick).unwrap_or(tick);
            all.extend(commands);
        }
        all
    }

    #[test]
    fn test_click_reveal_keeps_lock_below_max_stage() {
        let mut rt = runtime();
        let commands = click_reveal(&mut rt);

        assert!(commands.contains(&Command::RevealCompleted));
        assert_eq!(started(&commands, TimerKind::SettleDelay), None);
        assert!(!commands.contains(&Command::ReleaseScroll));
        assert_eq!(rt.sequencer().stage(), 0);
        assert_eq!(rt.phase(), LockPhase::Locked);

        // 收起后计数归零，仍然锁定
        let (commands, _) = rt.handle(RuntimeInput::Click);
        assert_eq!(started(&commands, TimerKind::SettleDelay), None);
        assert_eq!(rt.sequencer().reveal_count(), 0);
        assert_eq!(rt.phase(), LockPhase::Locked);
        let (_, disposition) = rt.handle(RuntimeInput::wheel(10.0));
        assert_eq!(disposition, InputDisposition::Intercepted);
    }

    #[test]
    fn test_click_reveal_unlocks_after_max_stage() {
        let mut rt = runtime();
        click_reveal(&mut rt);
        assert_eq!(rt.phase(), LockPhase::Locked);

        // 前四次未到顶，不应进入解锁
        for _ in 0..4 {
            let (commands, _) = rt.handle(RuntimeInput::wheel(41.0));
            assert_eq!(started(&commands, TimerKind::SettleDelay), None);
        }
        assert_eq!(rt.phase(), LockPhase::Locked);

        let (commands, disposition) = rt.handle(RuntimeInput::wheel(41.0));
        assert_eq!(disposition, InputDisposition::Intercepted);
        assert_eq!(rt.sequencer().stage(), 5);
        assert_eq!(rt.sequencer().reveal_count(), 12);
        // 已完成过的揭示不会再次上报
        assert!(!commands.contains(&Command::RevealCompleted));
        let settle = started(&commands, TimerKind::SettleDelay).expect("到顶后应进入解锁");
        assert_eq!(rt.phase(), LockPhase::Unlocking);

        let (commands, _) = rt.handle(RuntimeInput::timer(settle));
        assert_eq!(rt.phase(), LockPhase::Unlocked);
        assert!(commands.contains(&Command::ReleaseScroll));
    }

    #[test]
    fn test_section_title_decrypts_once_visible() {
        let mut rt = runtime();
        let commands = scroll_to_max(&mut rt);
        let mut tick = started(&commands, TimerKind::RevealTick).unwrap();
        let mut settle = None;
        while settle.is_none() {
            let (commands, _) = rt.handle(RuntimeInput::timer(tick));
            tick = started(&commands, TimerKind::RevealTick).unwrap_or(tick);
            settle = started(&commands, TimerKind::SettleDelay);
        }
        rt.handle(RuntimeInput::timer(settle.unwrap()));

        let (commands, _) = rt.handle(RuntimeInput::scrolled(900.0, 900.0));
        assert!(commands.contains(&Command::SetSectionVisible(true)));
        let mut title_tick = started(&commands, TimerKind::TitleTick).unwrap();
        assert_eq!(rt.snapshot().section_title.chars().count(), 5);

        for _ in 0..5 {
            let (commands, _) = rt.handle(RuntimeInput::timer(title_tick));
            if let Some(next) = started(&commands, TimerKind::TitleTick) {
                title_tick = next;
            }
        }
        assert_eq!(rt.snapshot().section_title, "about");
    }

    #[test]
    fn test_dispose_mid_reveal() {
        let mut rt = runtime();
        let commands = scroll_to_max(&mut rt);
        let tick = started(&commands, TimerKind::RevealTick).unwrap();

        let commands = rt.dispose();
        assert_eq!(
            commands,
            vec![Command::CancelTimer { id: tick }, Command::ReleaseScroll]
        );
        assert!(rt.dispose().is_empty());

        let (commands, disposition) = rt.handle(RuntimeInput::timer(tick));
        assert!(commands.is_empty());
        assert_eq!(disposition, InputDisposition::Native);
    }
}
