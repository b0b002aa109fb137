//! # Scheduler 模块
//!
//! 基于 tokio 的计时器调度器。
//!
//! 每个计时器是一个 sleep 任务，到期后把 [`TimerId`] 发回事件通道。
//! 取消即 abort 对应任务；调度器被丢弃时所有未到期任务一并 abort，
//! 保证组件卸载后不会再有状态被修改。

use std::collections::HashMap;
use std::time::Duration;

use reveal_runtime::TimerId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// 计时器调度器
#[derive(Debug)]
pub struct TimerScheduler {
    tx: mpsc::UnboundedSender<TimerId>,
    handles: HashMap<TimerId, JoinHandle<()>>,
}

impl TimerScheduler {
    /// 创建调度器和到期事件接收端
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                handles: HashMap::new(),
            },
            rx,
        )
    }

    /// 启动计时器
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn start(&mut self, id: TimerId, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // 接收端已关闭说明会话已结束，直接丢弃
            let _ = tx.send(id);
        });
        if let Some(previous) = self.handles.insert(id, handle) {
            previous.abort();
        }
        trace!(id = id.0, delay_ms = delay.as_millis() as u64, "计时器启动");
    }

    /// 取消计时器
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.handles.remove(&id) {
            handle.abort();
            trace!(id = id.0, "计时器取消");
        }
    }

    /// 到期事件已被消费，清理句柄
    pub fn acknowledge(&mut self, id: TimerId) {
        self.handles.remove(&id);
    }

    /// 未到期的计时器数量
    pub fn pending(&self) -> usize {
        self.handles.len()
    }

    /// 取消所有计时器
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (mut scheduler, mut rx) = TimerScheduler::new();
        scheduler.start(TimerId(1), Duration::from_millis(80));
        assert_eq!(scheduler.pending(), 1);

        let start = tokio::time::Instant::now();
        assert_eq!(rx.recv().await, Some(TimerId(1)));
        assert!(start.elapsed() >= Duration::from_millis(80));

        scheduler.acknowledge(TimerId(1));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (mut scheduler, mut rx) = TimerScheduler::new();
        scheduler.start(TimerId(1), Duration::from_millis(80));
        scheduler.start(TimerId(2), Duration::from_millis(200));
        scheduler.cancel(TimerId(1));

        assert_eq!(rx.recv().await, Some(TimerId(2)));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_everything() {
        let (mut scheduler, mut rx) = TimerScheduler::new();
        scheduler.start(TimerId(1), Duration::from_millis(10));
        scheduler.start(TimerId(2), Duration::from_millis(20));
        drop(scheduler);

        // 发送端全部释放后通道关闭，且没有任何到期事件
        assert_eq!(rx.recv().await, None);
    }
}
