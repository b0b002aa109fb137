//! # Session 模块
//!
//! About 页面会话：把 Runtime、指令执行器、计时器通道和渲染映射组装在一起。
//!
//! ## 主循环
//!
//! ```text
//! HostEvent ─► InputTranslator ─► RevealRuntime::handle ─► CommandExecutor
//!                                        ▲                      │
//!                                        └── Scrolled / TimerFired ◄┘
//! ```
//!
//! 程序化滚动产生的 `Scrolled` 反馈最多迭代 [`MAX_FEEDBACK_ROUNDS`] 轮。

use serde::Serialize;
use std::time::Duration;

use reveal_runtime::{
    Command, InputDisposition, RevealRuntime, RevealSnapshot, RuntimeInput, TimerId,
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::document::ScrollSurface;
use crate::error::HostResult;
use crate::executor::CommandExecutor;
use crate::input::{HostEvent, InputTranslator};
use crate::renderer::{BackgroundParallax, NameFrame};
use crate::trace::InputTrace;

/// 单次输入引起的反馈最大轮数
pub const MAX_FEEDBACK_ROUNDS: usize = 8;

/// 一帧记录
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    /// 相对回放开始的毫秒数
    pub at_ms: u64,
    /// 触发来源（事件名或 "timer"）
    pub source: String,
    pub disposition: Option<InputDisposition>,
    pub scroll_offset: f64,
    pub snapshot: RevealSnapshot,
    pub frame: NameFrame,
    pub background: BackgroundParallax,
}

/// 回放结果
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub frames: Vec<FrameRecord>,
    /// 揭示完成次数
    pub completions: usize,
    pub elapsed_ms: u64,
    pub final_snapshot: RevealSnapshot,
}

/// About 页面会话
#[derive(Debug)]
pub struct AboutSession<S: ScrollSurface> {
    config: AppConfig,
    runtime: RevealRuntime,
    executor: CommandExecutor<S>,
    timers: mpsc::UnboundedReceiver<TimerId>,
    translator: InputTranslator,
    background: BackgroundParallax,
    viewport: (f64, f64),
    mounted: bool,
    disposed: bool,
}

impl<S: ScrollSurface> AboutSession<S> {
    /// 创建会话
    ///
    /// 必须在 tokio 运行时内使用（计时器由 tokio 任务实现）。
    pub fn new(config: AppConfig, surface: S) -> HostResult<Self> {
        config.validate()?;

        let runtime = match config.debug.seed {
            Some(seed) => RevealRuntime::with_seed(config.runtime.clone(), seed)?,
            None => RevealRuntime::new(config.runtime.clone())?,
        };
        let viewport = (config.document.viewport_width, surface.viewport_height());
        let (executor, timers) = CommandExecutor::new(surface);

        Ok(Self {
            config,
            runtime,
            executor,
            timers,
            translator: InputTranslator::new(),
            background: BackgroundParallax::default(),
            viewport,
            mounted: false,
            disposed: false,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn runtime(&self) -> &RevealRuntime {
        &self.runtime
    }

    pub fn executor(&self) -> &CommandExecutor<S> {
        &self.executor
    }

    pub fn surface(&self) -> &S {
        self.executor.surface()
    }

    pub fn background(&self) -> BackgroundParallax {
        self.background
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        self.runtime.snapshot()
    }

    /// 当前名字布局
    pub fn frame(&self) -> NameFrame {
        NameFrame::compute(
            &self.runtime.snapshot(),
            &self.config.layout,
            self.config.runtime.reveal.left_len(),
        )
    }

    /// 挂载：获取滚动抑制，隐藏第二区块
    pub fn mount(&mut self) {
        if self.mounted || self.disposed {
            return;
        }
        self.mounted = true;
        let commands = self.runtime.mount();
        self.dispatch(commands);
        info!("About 会话已挂载");
    }

    /// 处理一个宿主事件，返回默认行为的处理方式
    pub fn handle_event(&mut self, event: &HostEvent) -> InputDisposition {
        if self.disposed {
            return InputDisposition::Native;
        }
        let translated = self.translator.translate(event);

        if let Some((x, y)) = translated.pointer {
            self.background
                .update(x, y, self.viewport, self.config.layout.parallax_range);
        }

        if let Some((width, height)) = translated.resize {
            let surface = self.executor.surface_mut();
            surface.resize(width, height);
            let offset = surface.scroll_offset();
            let viewport_height = surface.viewport_height();
            if width > 0.0 {
                self.viewport = (width, viewport_height);
            }
            self.feed(RuntimeInput::scrolled(offset, viewport_height));
        }

        let Some(input) = translated.input else {
            return InputDisposition::Native;
        };
        let (commands, disposition) = self.runtime.handle(input);
        self.dispatch(commands);

        // 没有被拦截的滚动由文档自己处理
        if !disposition.prevents_default()
            && let Some(delta) = translated.native_delta
            && let Some(offset) = self.executor.surface_mut().native_scroll_by(delta)
        {
            let viewport_height = self.executor.surface().viewport_height();
            self.feed(RuntimeInput::scrolled(offset, viewport_height));
        }

        disposition
    }

    /// 处理一次计时器到期
    pub fn fire_timer(&mut self, id: TimerId) {
        self.executor.acknowledge(id);
        self.feed(RuntimeInput::timer(id));
    }

    /// 等待下一个计时器到期并处理
    ///
    /// 没有未到期的计时器时立即返回 `None`。
    pub async fn next_timer(&mut self) -> Option<TimerId> {
        if self.executor.pending_timers() == 0 {
            return None;
        }
        let id = self.timers.recv().await?;
        self.fire_timer(id);
        Some(id)
    }

    /// 一直处理计时器直到空闲，返回处理的次数
    pub async fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while self.next_timer().await.is_some() {
            fired += 1;
        }
        fired
    }

    /// 按时间戳回放输入轨迹
    pub async fn replay(&mut self, trace: &InputTrace) -> HostResult<ReplayReport> {
        trace.validate()?;

        if let Some(height) = trace.viewport_height {
            let width = self.viewport.0;
            self.handle_event(&HostEvent::Resize { width, height });
        }
        self.mount();

        let start = Instant::now();
        let mut frames = Vec::new();
        for timed in &trace.events {
            let deadline = start + Duration::from_millis(timed.at_ms);
            self.advance_until(Some(deadline), start, &mut frames).await;

            let disposition = self.handle_event(&timed.event);
            debug!(event = timed.event.name(), at_ms = timed.at_ms, ?disposition, "回放事件");
            frames.push(self.record(timed.at_ms, timed.event.name(), Some(disposition)));
        }

        let end = trace
            .duration_ms
            .map(|ms| start + Duration::from_millis(ms));
        self.advance_until(end, start, &mut frames).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            events = trace.events.len(),
            elapsed_ms = elapsed_ms,
            completions = self.executor.completed(),
            "回放结束"
        );

        Ok(ReplayReport {
            frames,
            completions: self.executor.completed(),
            elapsed_ms,
            final_snapshot: self.runtime.snapshot(),
        })
    }

    /// 处理计时器直到截止时间；没有截止时间则直到空闲
    async fn advance_until(
        &mut self,
        deadline: Option<Instant>,
        start: Instant,
        frames: &mut Vec<FrameRecord>,
    ) {
        loop {
            let has_pending = self.executor.pending_timers() > 0;
            let fired = match deadline {
                Some(deadline) => tokio::select! {
                    biased;
                    id = self.timers.recv(), if has_pending => id,
                    _ = tokio::time::sleep_until(deadline) => None,
                },
                None if has_pending => self.timers.recv().await,
                None => None,
            };
            let Some(id) = fired else {
                break;
            };

            self.fire_timer(id);
            if self.config.debug.log_frames {
                let at_ms = start.elapsed().as_millis() as u64;
                frames.push(self.record(at_ms, "timer", None));
            }
        }
    }

    fn record(
        &self,
        at_ms: u64,
        source: &str,
        disposition: Option<InputDisposition>,
    ) -> FrameRecord {
        FrameRecord {
            at_ms,
            source: source.to_string(),
            disposition,
            scroll_offset: self.surface().scroll_offset(),
            snapshot: self.runtime.snapshot(),
            frame: self.frame(),
            background: self.background,
        }
    }

    /// 送入一个内部输入（计时器、滚动位置）
    fn feed(&mut self, input: RuntimeInput) {
        let (commands, _) = self.runtime.handle(input);
        self.dispatch(commands);
    }

    /// 执行指令，并把程序化滚动的结果送回 Runtime
    fn dispatch(&mut self, commands: Vec<Command>) {
        let mut feedback = self.executor.execute_all(commands);
        let mut rounds = 0;
        while !feedback.is_empty() {
            rounds += 1;
            if rounds > MAX_FEEDBACK_ROUNDS {
                warn!(dropped = feedback.len(), "滚动反馈轮数过多，丢弃剩余反馈");
                break;
            }
            let mut next = Vec::new();
            for input in feedback {
                let (commands, _) = self.runtime.handle(input);
                next.extend(self.executor.execute_all(commands));
            }
            feedback = next;
        }
    }

    /// 卸载：取消所有计时器并释放滚动抑制
    ///
    /// 可重复调用，丢弃时自动调用。
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let commands = self.runtime.dispose();
        self.executor.execute_all(commands);
        self.executor.shutdown();
        info!("About 会话已卸载");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<S: ScrollSurface> Drop for AboutSession<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
