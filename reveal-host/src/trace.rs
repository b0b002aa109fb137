//! # Trace 模块
//!
//! 输入轨迹：带时间戳的宿主事件序列，用于无界面回放。
//!
//! ```json
//! {
//!   "viewport_height": 900,
//!   "duration_ms": 4000,
//!   "events": [
//!     { "at_ms": 0, "event": { "type": "wheel", "delta_y": 41 } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HostError, HostResult};
use crate::input::HostEvent;

/// 带时间戳的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// 相对回放开始的毫秒数
    pub at_ms: u64,
    pub event: HostEvent,
}

/// 输入轨迹
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTrace {
    /// 覆盖配置中的视口高度
    #[serde(default)]
    pub viewport_height: Option<f64>,
    /// 回放总时长；不设置则一直运行到没有计时器为止
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub events: Vec<TimedEvent>,
}

impl InputTrace {
    /// 从文件加载并验证
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| HostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let trace: Self = serde_json::from_str(&content).map_err(|e| HostError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        trace.validate()?;
        Ok(trace)
    }

    /// 从字符串解析并验证
    pub fn parse(content: &str) -> HostResult<Self> {
        let trace: Self =
            serde_json::from_str(content).map_err(|e| HostError::Serialization(e.to_string()))?;
        trace.validate()?;
        Ok(trace)
    }

    /// 检查时间戳单调不减、数值有限、时长覆盖所有事件
    pub fn validate(&self) -> HostResult<()> {
        if let Some(height) = self.viewport_height
            && !(height.is_finite() && height > 0.0)
        {
            return Err(HostError::InvalidTrace {
                index: 0,
                message: format!("视口高度无效: {height}"),
            });
        }

        let mut last = 0;
        for (index, timed) in self.events.iter().enumerate() {
            if timed.at_ms < last {
                return Err(HostError::InvalidTrace {
                    index,
                    message: format!("时间戳倒退: {} < {}", timed.at_ms, last),
                });
            }
            if !timed.event.is_finite() {
                return Err(HostError::InvalidTrace {
                    index,
                    message: format!("事件 {} 含有无效数值", timed.event.name()),
                });
            }
            last = timed.at_ms;
        }

        if let Some(duration) = self.duration_ms
            && duration < last
        {
            return Err(HostError::InvalidTrace {
                index: self.events.len().saturating_sub(1),
                message: format!("回放时长 {duration} 短于最后一个事件 {last}"),
            });
        }

        Ok(())
    }

    /// 最后一个事件的时间戳
    pub fn last_event_ms(&self) -> u64 {
        self.events.last().map(|e| e.at_ms).unwrap_or(0)
    }
}
