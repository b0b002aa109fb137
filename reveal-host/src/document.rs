//! # Document 模块
//!
//! 滚动表面抽象。
//!
//! - [`ScrollSurface`]：Host 对文档滚动的最小需求
//! - [`SimulatedDocument`]：内存中的文档，供无界面 CLI 和测试使用
//! - [`ScrollSuppression`]：文档级滚动抑制，显式获取 / 释放，丢弃时保证释放

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::config::DocumentConfig;

/// 滚动表面
pub trait ScrollSurface {
    /// 当前滚动偏移
    fn scroll_offset(&self) -> f64;

    /// 视口高度
    fn viewport_height(&self) -> f64;

    /// 命名区块的顶部偏移
    fn section_offset(&self, id: &str) -> Option<f64>;

    /// 平滑滚动到指定偏移，返回实际（夹取后）的偏移
    fn smooth_scroll_to(&mut self, offset: f64) -> f64;

    /// 启用 / 禁用原生滚动
    fn set_native_scroll_enabled(&mut self, enabled: bool);

    fn native_scroll_enabled(&self) -> bool;

    /// 应用一次原生滚动（wheel / touch 的默认行为）
    ///
    /// 原生滚动被禁用时返回 `None`，否则返回新的偏移。
    fn native_scroll_by(&mut self, delta: f64) -> Option<f64>;

    /// 设置第二区块可见性
    fn set_section_visible(&mut self, visible: bool);

    /// 视口尺寸变化
    fn resize(&mut self, width: f64, height: f64);
}

/// 模拟文档状态
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub offset: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub content_height: f64,
    pub native_scroll_enabled: bool,
    pub section_visible: bool,
    /// 命名区块及其顶部偏移
    pub sections: Vec<(String, f64)>,
    /// 程序化滚动的目标历史（夹取后）
    pub programmatic_scrolls: Vec<f64>,
}

impl DocumentState {
    fn max_offset(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn clamp(&self, offset: f64) -> f64 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            self.offset
        }
    }
}

/// 内存中的模拟文档
///
/// 克隆共享同一份状态，测试可以在 Host 持有文档的同时观察它。
#[derive(Debug, Clone)]
pub struct SimulatedDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl SimulatedDocument {
    /// 按配置创建：第一屏是名字，目标区块紧随其后
    pub fn from_config(config: &DocumentConfig, target_section: &str) -> Self {
        let state = DocumentState {
            offset: 0.0,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            content_height: config.content_height,
            native_scroll_enabled: true,
            section_visible: true,
            sections: vec![(target_section.to_string(), config.viewport_height)],
            programmatic_scrolls: Vec::new(),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// 当前状态的拷贝
    pub fn state(&self) -> DocumentState {
        self.state.borrow().clone()
    }

    pub fn viewport_width(&self) -> f64 {
        self.state.borrow().viewport_width
    }

    pub fn is_section_visible(&self) -> bool {
        self.state.borrow().section_visible
    }
}

impl ScrollSurface for SimulatedDocument {
    fn scroll_offset(&self) -> f64 {
        self.state.borrow().offset
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport_height
    }

    fn section_offset(&self, id: &str) -> Option<f64> {
        self.state
            .borrow()
            .sections
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, offset)| *offset)
    }

    fn smooth_scroll_to(&mut self, offset: f64) -> f64 {
        let mut state = self.state.borrow_mut();
        let target = state.clamp(offset);
        state.offset = target;
        state.programmatic_scrolls.push(target);
        debug!(offset = target, "平滑滚动");
        target
    }

    fn set_native_scroll_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().native_scroll_enabled = enabled;
    }

    fn native_scroll_enabled(&self) -> bool {
        self.state.borrow().native_scroll_enabled
    }

    fn native_scroll_by(&mut self, delta: f64) -> Option<f64> {
        let mut state = self.state.borrow_mut();
        if !state.native_scroll_enabled {
            return None;
        }
        let target = state.clamp(state.offset + delta);
        state.offset = target;
        Some(target)
    }

    fn set_section_visible(&mut self, visible: bool) {
        self.state.borrow_mut().section_visible = visible;
    }

    fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return;
        }
        let mut state = self.state.borrow_mut();
        // 区块紧随第一屏，跟着视口高度移动
        let old_height = state.viewport_height;
        for (_, offset) in state.sections.iter_mut() {
            if *offset == old_height {
                *offset = height;
            }
        }
        state.content_height = state.content_height.max(height);
        state.viewport_width = width;
        state.viewport_height = height;
        state.offset = state.clamp(state.offset);
    }
}

/// 文档级滚动抑制
///
/// 持有期间原生滚动被禁用。`acquire` / `release` 幂等，
/// 被丢弃时如果仍然持有则自动释放。
#[derive(Debug)]
pub struct ScrollSuppression<S: ScrollSurface> {
    surface: S,
    held: bool,
}

impl<S: ScrollSurface> ScrollSuppression<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            held: false,
        }
    }

    /// 获取抑制，返回是否发生了变化
    pub fn acquire(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.surface.set_native_scroll_enabled(false);
        debug!("文档滚动已抑制");
        true
    }

    /// 释放抑制，返回是否发生了变化
    pub fn release(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.held = false;
        self.surface.set_native_scroll_enabled(true);
        debug!("文档滚动已恢复");
        true
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: ScrollSurface> Drop for ScrollSuppression<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> SimulatedDocument {
        SimulatedDocument::from_config(&DocumentConfig::default(), "about-details")
    }

    #[test]
    fn test_section_lookup() {
        let doc = document();
        assert_eq!(doc.section_offset("about-details"), Some(900.0));
        assert_eq!(doc.section_offset("missing"), None);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut doc = document();
        assert_eq!(doc.smooth_scroll_to(5000.0), 900.0);
        assert_eq!(doc.smooth_scroll_to(-10.0), 0.0);
        assert_eq!(doc.native_scroll_by(120.0), Some(120.0));
        assert_eq!(doc.native_scroll_by(f64::NAN), Some(120.0));
        assert_eq!(doc.state().programmatic_scrolls, vec![900.0, 0.0]);
    }

    #[test]
    fn test_native_scroll_disabled() {
        let mut doc = document();
        doc.set_native_scroll_enabled(false);
        assert_eq!(doc.native_scroll_by(100.0), None);
        assert_eq!(doc.scroll_offset(), 0.0);
    }

    #[test]
    fn test_resize_moves_following_section() {
        let mut doc = document();
        doc.resize(800.0, 600.0);
        assert_eq!(doc.viewport_height(), 600.0);
        assert_eq!(doc.section_offset("about-details"), Some(600.0));

        doc.resize(0.0, 600.0);
        assert_eq!(doc.viewport_width(), 800.0);
    }

    #[test]
    fn test_suppression_idempotent_and_released_on_drop() {
        let doc = document();
        let observer = doc.clone();

        let mut suppression = ScrollSuppression::new(doc);
        assert!(suppression.acquire());
        assert!(!suppression.acquire());
        assert!(!observer.native_scroll_enabled());

        assert!(suppression.release());
        assert!(!suppression.release());
        assert!(observer.native_scroll_enabled());

        suppression.acquire();
        drop(suppression);
        assert!(observer.native_scroll_enabled());
    }
}
