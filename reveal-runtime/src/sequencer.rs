//! # Sequencer 模块
//!
//! 名字揭示序列：把离散的阶段和定时推进的揭示计数转换为渲染进度。
//!
//! ## 激活规则
//!
//! ```text
//! engaged = hovered || expanded_by_click || stage >= activation_stage
//! active  = expanded_by_click || stage == max_stage
//! ```
//!
//! - `engaged`：H / I 开始分离，但不揭示字符
//! - `active`：逐字揭示计时器运行；一旦失去 `active`，计数立即归零
//!
//! 完成信号只在计数从 `total - 1` 变为 `total` 的那一次 tick 上产生，
//! 所以同一次激活内最多触发一次。

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::cipher::scramble;
use crate::config::RevealConfig;
use crate::state::RevealState;
use crate::timer::{Outbox, TimerId, TimerKind, TimerSlot};

/// 名字揭示序列
#[derive(Debug)]
pub struct RevealSequencer {
    config: RevealConfig,
    state: RevealState,
    /// 未揭示部分的乱码，长度始终等于 `total - reveal_count`
    cipher: String,
    tick: TimerSlot,
    rng: StdRng,
}

impl RevealSequencer {
    /// 创建新的揭示序列
    pub fn new(config: RevealConfig, mut rng: StdRng) -> Self {
        let cipher = scramble(config.total_chars(), &mut rng);
        Self {
            config,
            state: RevealState::default(),
            cipher,
            tick: TimerSlot::new(TimerKind::RevealTick),
            rng,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn stage(&self) -> u32 {
        self.state.stage
    }

    pub fn reveal_count(&self) -> usize {
        self.state.reveal_count
    }

    pub fn total_chars(&self) -> usize {
        self.config.total_chars()
    }

    /// 是否已到达最大阶段
    pub fn at_max_stage(&self) -> bool {
        self.state.stage >= self.config.max_stage
    }

    /// 推进一个阶段
    ///
    /// 饱和计数：已在最大阶段时不做任何事。返回是否真正推进。
    pub fn advance_stage(&mut self, outbox: &mut Outbox) -> bool {
        if self.at_max_stage() {
            return false;
        }
        self.state.stage += 1;
        debug!(
            stage = self.state.stage,
            max_stage = self.config.max_stage,
            "阶段推进"
        );
        self.sync(outbox);
        true
    }

    /// 设置悬停状态
    pub fn set_hovered(&mut self, hovered: bool, outbox: &mut Outbox) {
        self.state.hovered = hovered;
        self.sync(outbox);
    }

    /// 设置点击展开状态
    pub fn set_expanded_by_click(&mut self, expanded: bool, outbox: &mut Outbox) {
        self.state.expanded_by_click = expanded;
        self.sync(outbox);
    }

    /// 指针进入
    pub fn pointer_enter(&mut self, outbox: &mut Outbox) {
        self.set_hovered(true, outbox);
    }

    /// 指针离开：展开状态下保持悬停
    pub fn pointer_leave(&mut self, outbox: &mut Outbox) {
        if !self.state.expanded_by_click {
            self.set_hovered(false, outbox);
        }
    }

    /// 点击：悬停时展开，已展开时收起并清除悬停
    pub fn click(&mut self, outbox: &mut Outbox) {
        if self.state.expanded_by_click {
            self.state.hovered = false;
            self.set_expanded_by_click(false, outbox);
        } else if self.state.hovered {
            self.set_expanded_by_click(true, outbox);
        }
    }

    /// 是否处于逐字揭示中
    pub fn is_active(&self) -> bool {
        self.state.expanded_by_click || self.at_max_stage()
    }

    /// 是否处于分离状态
    pub fn is_engaged(&self) -> bool {
        self.state.hovered
            || self.state.expanded_by_click
            || self.state.stage >= self.config.activation_stage
    }

    /// 是否已全部揭示
    pub fn is_complete(&self) -> bool {
        self.is_active() && self.state.reveal_count == self.total_chars()
    }

    /// H / I 初始分离进度
    pub fn engagement_fraction(&self) -> f32 {
        if self.state.hovered || self.state.expanded_by_click {
            return 1.0;
        }
        self.config
            .engagement
            .fraction(self.state.stage, self.config.activation_stage)
    }

    /// 全名展开进度
    pub fn name_expansion_fraction(&self) -> f32 {
        if self.is_active() {
            self.state.reveal_count as f32 / self.total_chars() as f32
        } else {
            0.0
        }
    }

    /// 已揭示的左侧名字
    pub fn revealed_left(&self) -> String {
        self.config
            .left_name
            .chars()
            .take(self.state.reveal_count)
            .collect()
    }

    /// 已揭示的右侧名字
    pub fn revealed_right(&self) -> String {
        let skip = self.config.left_len();
        self.config
            .right_name
            .chars()
            .take(self.state.reveal_count.saturating_sub(skip))
            .collect()
    }

    /// 未揭示部分的乱码
    pub fn cipher_text(&self) -> &str {
        &self.cipher
    }

    /// 该计时器是否属于本序列
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.tick.armed_id() == Some(id)
    }

    /// 处理逐字揭示 tick
    ///
    /// 返回 `true` 表示本次 tick 完成了全部揭示。
    pub fn on_tick(&mut self, id: TimerId, outbox: &mut Outbox) -> bool {
        if !self.tick.claim(id) {
            return false;
        }
        if !self.is_active() {
            self.sync(outbox);
            return false;
        }

        let total = self.total_chars();
        self.state.reveal_count = (self.state.reveal_count + 1).min(total);
        self.refresh_cipher();

        if self.state.reveal_count == total {
            info!(total = total, "名字揭示完成");
            true
        } else {
            self.tick.arm(self.config.tick_interval(), outbox);
            false
        }
    }

    /// 显式重置：阶段、计数、悬停、展开全部归零
    pub fn reset(&mut self, outbox: &mut Outbox) {
        self.tick.cancel(outbox);
        self.state = RevealState::default();
        self.refresh_cipher();
    }

    /// 根据当前激活状态启动或取消计时器
    fn sync(&mut self, outbox: &mut Outbox) {
        if self.is_active() {
            if self.state.reveal_count < self.total_chars() && !self.tick.is_armed() {
                self.tick.arm(self.config.tick_interval(), outbox);
            }
        } else {
            self.tick.cancel(outbox);
            if self.state.reveal_count != 0 {
                debug!(reveal_count = self.state.reveal_count, "揭示中断，计数归零");
                self.state.reveal_count = 0;
                self.refresh_cipher();
            }
        }
    }

    fn refresh_cipher(&mut self) {
        let remaining = self.total_chars() - self.state.reveal_count;
        self.cipher = scramble(remaining, &mut self.rng);
    }
}
