//! # Driver 模块
//!
//! 把高频的滚动 / 触摸位移离散化为低频的阶段推进。
//!
//! 累加器只有一个所有者：[`ScrollStageDriver`]。
//! 滚动锁协调器拦截事件后直接交给这里，外部想跳过累积直接推进时调用
//! [`ScrollStageDriver::advance_stage`]，两条路径最终都落到同一个 [`StageSink`]。

use tracing::trace;

use crate::sequencer::RevealSequencer;
use crate::timer::Outbox;

/// 阶段推进的接收方
pub trait StageSink {
    /// 推进一个阶段，返回是否真正推进
    fn advance_stage(&mut self, outbox: &mut Outbox) -> bool;

    /// 是否已到达最大阶段
    fn at_max_stage(&self) -> bool;
}

impl StageSink for RevealSequencer {
    fn advance_stage(&mut self, outbox: &mut Outbox) -> bool {
        RevealSequencer::advance_stage(self, outbox)
    }

    fn at_max_stage(&self) -> bool {
        RevealSequencer::at_max_stage(self)
    }
}

/// 滚动量累加器
///
/// `accumulated` 存的是位移绝对值之和，永不为负；越过阈值并推进一次后归零。
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAccumulator {
    last_position: f64,
    accumulated: f64,
    threshold: f64,
}

impl ScrollAccumulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            last_position: 0.0,
            accumulated: 0.0,
            threshold: threshold.max(0.0),
        }
    }

    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// 记录一个新位置，返回是否越过阈值
    fn record(&mut self, position: f64) -> bool {
        self.accumulated += (position - self.last_position).abs();
        self.last_position = position;
        self.accumulated > self.threshold
    }

    /// 重新定位起点，不产生位移
    fn rebase(&mut self, position: f64) {
        self.last_position = position;
    }

    fn clear(&mut self) {
        self.accumulated = 0.0;
    }
}

/// 滚动阶段驱动器
#[derive(Debug, Clone)]
pub struct ScrollStageDriver {
    accumulator: ScrollAccumulator,
}

impl ScrollStageDriver {
    pub fn new(threshold: f64) -> Self {
        Self {
            accumulator: ScrollAccumulator::new(threshold),
        }
    }

    pub fn accumulator(&self) -> &ScrollAccumulator {
        &self.accumulator
    }

    /// 处理一次位置变化
    ///
    /// 返回是否推进了阶段。
    pub fn on_motion<S: StageSink + ?Sized>(
        &mut self,
        position: f64,
        sink: &mut S,
        outbox: &mut Outbox,
    ) -> bool {
        if !position.is_finite() {
            return false;
        }
        let crossed = self.accumulator.record(position);
        trace!(
            position = position,
            accumulated = self.accumulator.accumulated(),
            "滚动累积"
        );
        if crossed && !sink.at_max_stage() {
            self.accumulator.clear();
            return sink.advance_stage(outbox);
        }
        false
    }

    /// 滚轮增量：在虚拟位置上累加
    pub fn on_wheel<S: StageSink + ?Sized>(
        &mut self,
        delta_y: f64,
        sink: &mut S,
        outbox: &mut Outbox,
    ) -> bool {
        if !delta_y.is_finite() {
            return false;
        }
        let position = self.accumulator.last_position() + delta_y;
        self.on_motion(position, sink, outbox)
    }

    /// 触摸开始：只重新定位
    pub fn on_touch_start(&mut self, y: f64) {
        if y.is_finite() {
            self.accumulator.rebase(y);
        }
    }

    /// 外部直接推进，不经过累加器
    pub fn advance_stage<S: StageSink + ?Sized>(
        &mut self,
        sink: &mut S,
        outbox: &mut Outbox,
    ) -> bool {
        sink.advance_stage(outbox)
    }
}
