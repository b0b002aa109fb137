//! 背景视差

use serde::{Deserialize, Serialize};

/// 背景位置（百分比）
///
/// 鼠标在视口中心时为 50% 50%，向边缘最多偏移 `range / 2`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundParallax {
    pub x: f32,
    pub y: f32,
}

impl Default for BackgroundParallax {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

impl BackgroundParallax {
    /// 根据鼠标位置更新
    pub fn update(&mut self, client_x: f64, client_y: f64, viewport: (f64, f64), range: f32) {
        let (width, height) = viewport;
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let x = (client_x / width).clamp(0.0, 1.0) as f32;
        let y = (client_y / height).clamp(0.0, 1.0) as f32;
        if x.is_nan() || y.is_nan() {
            return;
        }
        self.x = 50.0 + (x - 0.5) * range;
        self.y = 50.0 + (y - 0.5) * range;
    }

    /// CSS `background-position` 值
    pub fn css(&self) -> String {
        format!("{}% {}%", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallax_range() {
        let mut bg = BackgroundParallax::default();
        assert_eq!(bg.css(), "50% 50%");

        bg.update(0.0, 900.0, (1440.0, 900.0), 8.0);
        assert_eq!((bg.x, bg.y), (46.0, 54.0));

        bg.update(720.0, 450.0, (1440.0, 900.0), 8.0);
        assert_eq!((bg.x, bg.y), (50.0, 50.0));

        // 视口外的坐标被夹取
        bg.update(-500.0, 5000.0, (1440.0, 900.0), 8.0);
        assert_eq!((bg.x, bg.y), (46.0, 54.0));
    }

    #[test]
    fn test_degenerate_viewport_ignored() {
        let mut bg = BackgroundParallax::default();
        bg.update(10.0, 10.0, (0.0, 900.0), 8.0);
        assert_eq!(bg, BackgroundParallax::default());
    }
}
