//! # Executor 模块
//!
//! 执行 Runtime 发出的指令。
//!
//! 程序化滚动会改变文档偏移，执行器把结果作为 `Scrolled` 输入返回，
//! 由会话再送回 Runtime。

use reveal_runtime::{Command, RuntimeInput, ScrollTarget, TimerId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::document::{ScrollSuppression, ScrollSurface};
use crate::scheduler::TimerScheduler;

/// 指令执行器
#[derive(Debug)]
pub struct CommandExecutor<S: ScrollSurface> {
    scheduler: TimerScheduler,
    suppression: ScrollSuppression<S>,
    completed: usize,
}

impl<S: ScrollSurface> CommandExecutor<S> {
    /// 创建执行器和计时器到期接收端
    pub fn new(surface: S) -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (scheduler, rx) = TimerScheduler::new();
        (
            Self {
                scheduler,
                suppression: ScrollSuppression::new(surface),
                completed: 0,
            },
            rx,
        )
    }

    pub fn surface(&self) -> &S {
        self.suppression.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.suppression.surface_mut()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppression.is_held()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// 收到的完成通知次数
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// 计时器到期事件已被消费
    pub fn acknowledge(&mut self, id: TimerId) {
        self.scheduler.acknowledge(id);
    }

    /// 执行单条指令，返回需要回送给 Runtime 的输入
    pub fn execute(&mut self, command: Command) -> Option<RuntimeInput> {
        match command {
            Command::StartTimer { id, delay, .. } => {
                self.scheduler.start(id, delay);
                None
            }
            Command::CancelTimer { id } => {
                self.scheduler.cancel(id);
                None
            }
            Command::SuppressScroll => {
                self.suppression.acquire();
                None
            }
            Command::ReleaseScroll => {
                self.suppression.release();
                None
            }
            Command::ScrollTo(target) => self.scroll_to(target),
            Command::SetSectionVisible(visible) => {
                debug!(visible = visible, "第二区块可见性");
                self.surface_mut().set_section_visible(visible);
                None
            }
            Command::RevealCompleted => {
                self.completed += 1;
                info!("名字揭示完成");
                None
            }
        }
    }

    /// 执行一批指令
    pub fn execute_all(&mut self, commands: Vec<Command>) -> Vec<RuntimeInput> {
        commands
            .into_iter()
            .filter_map(|command| self.execute(command))
            .collect()
    }

    fn scroll_to(&mut self, target: ScrollTarget) -> Option<RuntimeInput> {
        let offset = match target {
            ScrollTarget::Offset(offset) => offset,
            ScrollTarget::Section(id) => match self.surface().section_offset(&id) {
                Some(offset) => offset,
                None => {
                    warn!(section = %id, "找不到目标区块，跳过滚动");
                    return None;
                }
            },
        };
        let surface = self.surface_mut();
        let offset = surface.smooth_scroll_to(offset);
        Some(RuntimeInput::scrolled(offset, surface.viewport_height()))
    }

    /// 取消全部计时器并释放滚动抑制
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.suppression.release();
    }
}
