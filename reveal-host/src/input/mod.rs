//! # Input 模块
//!
//! 原始宿主事件到 `RuntimeInput` 的转换。
//!
//! ## 设计说明
//!
//! - [`HostEvent`] 对应浏览器侧的 wheel / touch / mouse / resize 事件，
//!   可直接从输入轨迹 JSON 反序列化
//! - [`InputTranslator`] 记录上一次触摸位置，用来计算触摸的原生滚动量
//! - 鼠标移动和尺寸变化不进入 Runtime，只影响视差和视口

use reveal_runtime::RuntimeInput;
use serde::{Deserialize, Serialize};

/// 原始宿主事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Wheel { delta_y: f64 },
    TouchStart { client_y: f64 },
    TouchMove { client_y: f64 },
    MouseEnter,
    MouseLeave,
    Click,
    MouseMove { client_x: f64, client_y: f64 },
    Resize { width: f64, height: f64 },
    /// 外部直接推进阶段
    Advance,
}

impl HostEvent {
    /// 事件名（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wheel { .. } => "wheel",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::MouseEnter => "mouse_enter",
            Self::MouseLeave => "mouse_leave",
            Self::Click => "click",
            Self::MouseMove { .. } => "mouse_move",
            Self::Resize { .. } => "resize",
            Self::Advance => "advance",
        }
    }

    /// 数值字段是否都有效
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Wheel { delta_y } => delta_y.is_finite(),
            Self::TouchStart { client_y } | Self::TouchMove { client_y } => client_y.is_finite(),
            Self::MouseMove { client_x, client_y } => client_x.is_finite() && client_y.is_finite(),
            Self::Resize { width, height } => width.is_finite() && height.is_finite(),
            Self::MouseEnter | Self::MouseLeave | Self::Click | Self::Advance => true,
        }
    }
}

/// 一次转换的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translated {
    /// 交给 Runtime 的输入
    pub input: Option<RuntimeInput>,
    /// 如果没有被拦截，默认行为会产生的原生滚动量
    pub native_delta: Option<f64>,
    /// 指针位置（视差用）
    pub pointer: Option<(f64, f64)>,
    /// 新的视口尺寸
    pub resize: Option<(f64, f64)>,
}

/// 输入转换器
#[derive(Debug, Default)]
pub struct InputTranslator {
    last_touch_y: Option<f64>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 转换一个宿主事件
    pub fn translate(&mut self, event: &HostEvent) -> Translated {
        match *event {
            HostEvent::Wheel { delta_y } => Translated {
                input: Some(RuntimeInput::wheel(delta_y)),
                native_delta: Some(delta_y),
                ..Default::default()
            },
            HostEvent::TouchStart { client_y } => {
                self.last_touch_y = Some(client_y);
                Translated {
                    input: Some(RuntimeInput::TouchStart { y: client_y }),
                    ..Default::default()
                }
            }
            HostEvent::TouchMove { client_y } => {
                // 手指上移，页面向下滚
                let native_delta = self.last_touch_y.map(|last| last - client_y);
                self.last_touch_y = Some(client_y);
                Translated {
                    input: Some(RuntimeInput::touch_move(client_y)),
                    native_delta,
                    ..Default::default()
                }
            }
            HostEvent::MouseEnter => Self::only(RuntimeInput::PointerEnter),
            HostEvent::MouseLeave => Self::only(RuntimeInput::PointerLeave),
            HostEvent::Click => Self::only(RuntimeInput::Click),
            HostEvent::Advance => Self::only(RuntimeInput::Advance),
            HostEvent::MouseMove { client_x, client_y } => Translated {
                pointer: Some((client_x, client_y)),
                ..Default::default()
            },
            HostEvent::Resize { width, height } => Translated {
                resize: Some((width, height)),
                ..Default::default()
            },
        }
    }

    fn only(input: RuntimeInput) -> Translated {
        Translated {
            input: Some(input),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let event: HostEvent = serde_json::from_str(r#"{"type":"wheel","delta_y":41.5}"#).unwrap();
        assert_eq!(event, HostEvent::Wheel { delta_y: 41.5 });

        let event: HostEvent = serde_json::from_str(r#"{"type":"mouse_enter"}"#).unwrap();
        assert_eq!(event, HostEvent::MouseEnter);
        assert_eq!(event.name(), "mouse_enter");

        assert!(serde_json::from_str::<HostEvent>(r#"{"type":"keypress"}"#).is_err());
    }

    #[test]
    fn test_touch_native_delta() {
        let mut translator = InputTranslator::new();

        let first = translator.translate(&HostEvent::TouchMove { client_y: 500.0 });
        assert_eq!(first.native_delta, None);

        translator.translate(&HostEvent::TouchStart { client_y: 500.0 });
        let moved = translator.translate(&HostEvent::TouchMove { client_y: 440.0 });
        assert_eq!(moved.input, Some(RuntimeInput::TouchMove { y: 440.0 }));
        assert_eq!(moved.native_delta, Some(60.0));
    }

    #[test]
    fn test_pointer_and_resize_stay_in_host() {
        let mut translator = InputTranslator::new();

        let moved = translator.translate(&HostEvent::MouseMove {
            client_x: 10.0,
            client_y: 20.0,
        });
        assert_eq!(moved.input, None);
        assert_eq!(moved.pointer, Some((10.0, 20.0)));

        let resized = translator.translate(&HostEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        assert_eq!(resized.resize, Some((800.0, 600.0)));

        let click = translator.translate(&HostEvent::Click);
        assert_eq!(click.input, Some(RuntimeInput::Click));
        assert_eq!(click.native_delta, None);
    }

    #[test]
    fn test_non_finite_events_detected() {
        assert!(!HostEvent::Wheel { delta_y: f64::NAN }.is_finite());
        assert!(HostEvent::Click.is_finite());
    }
}
