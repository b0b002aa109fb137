//! 名字布局帧

use reveal_runtime::RevealSnapshot;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// 两个不换行空格，分隔左右名字
pub const NAME_SEPARATOR: &str = "\u{00A0}\u{00A0}";

/// 一帧名字布局
///
/// H 向左、I 向右移动，位移 = 分离进度 × hi 最大位移 × 0.5 + 展开进度 × 名字最大位移 × 0.5。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameFrame {
    /// H 的水平位移（像素，负数向左）
    pub h_translate_x: f32,
    /// I 的水平位移（像素）
    pub i_translate_x: f32,
    pub h_opacity: f32,
    pub i_opacity: f32,
    /// 中间文本透明度
    pub center_opacity: f32,
    /// 中间文本：左名 + 分隔 + 右名 + 乱码
    pub center_text: String,
}

impl NameFrame {
    /// 由快照计算布局
    ///
    /// `left_len` 为左侧名字的字符数：揭示到右侧名字第一个字符时 I 隐去。
    pub fn compute(snapshot: &RevealSnapshot, layout: &LayoutConfig, left_len: usize) -> Self {
        let offset = snapshot.engagement * layout.hi_max_translate * 0.5
            + snapshot.name_expansion * layout.name_max_translate * 0.5;

        let mut center_text = String::new();
        center_text.push_str(&snapshot.revealed_left);
        if !snapshot.revealed_left.is_empty() && !snapshot.revealed_right.is_empty() {
            center_text.push_str(NAME_SEPARATOR);
        }
        center_text.push_str(&snapshot.revealed_right);
        center_text.push_str(&snapshot.cipher);

        Self {
            h_translate_x: -offset,
            i_translate_x: offset,
            h_opacity: if snapshot.reveal_count >= 1 { 0.0 } else { 1.0 },
            i_opacity: if snapshot.reveal_count > left_len { 0.0 } else { 1.0 },
            center_opacity: if snapshot.active { 1.0 } else { 0.0 },
            center_text,
        }
    }
}
