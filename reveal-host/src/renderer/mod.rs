//! # Renderer 模块
//!
//! 把 Runtime 快照映射为视觉参数。
//!
//! ## 渲染层顺序
//!
//! 1. 背景层（视差）
//! 2. H / I 两个字母
//! 3. 中间文本（已揭示名字 + 乱码）
//! 4. 第二区块（标题解密）

pub mod name_frame;
pub mod parallax;

pub use name_frame::{NAME_SEPARATOR, NameFrame};
pub use parallax::BackgroundParallax;

use reveal_runtime::RevealSnapshot;

/// 单行文本描述，供无界面模式输出
pub fn describe(snapshot: &RevealSnapshot, frame: &NameFrame) -> String {
    let center = frame.center_text.replace(NAME_SEPARATOR, "  ");
    let mut line = format!(
        "stage {} | {:>2}/{} | H {:+7.1} I {:+7.1} | {:?}",
        snapshot.stage,
        snapshot.reveal_count,
        snapshot.total_chars,
        frame.h_translate_x,
        frame.i_translate_x,
        snapshot.phase,
    );
    if frame.center_opacity > 0.0 {
        line.push_str(&format!(" | {center}"));
    }
    if snapshot.section_visible {
        line.push_str(&format!(" | [{}]", snapshot.section_title));
    }
    line
}
