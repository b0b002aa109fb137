//! # Cipher 模块
//!
//! "乱码"填充文本。
//!
//! 尚未揭示的字符位用随机符号占位，每次刷新都重新生成，
//! 看起来像是在不停地解密。

use rand::Rng;
use std::time::Duration;

/// 乱码字符表
pub const CIPHER_ALPHABET: &str = "-_~`!@#$%^&*()+=[]{}|;:,.<>?";

/// 生成指定长度的乱码
///
/// 每个字符从 [`CIPHER_ALPHABET`] 中独立均匀抽取。
pub fn scramble<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    let alphabet = CIPHER_ALPHABET.as_bytes();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// 打字机式解密文本
///
/// 每次 [`tick`](Self::tick) 揭示一个字符，剩余部分用乱码填充。
#[derive(Debug, Clone)]
pub struct EncryptedText {
    text: String,
    interval: Duration,
    revealed: usize,
}

impl EncryptedText {
    /// 默认揭示间隔
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    pub fn new(text: impl Into<String>) -> Self {
        Self::with_interval(text, Self::DEFAULT_INTERVAL)
    }

    pub fn with_interval(text: impl Into<String>, interval: Duration) -> Self {
        Self {
            text: text.into(),
            interval,
            revealed: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 已揭示字符数
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// 是否全部揭示
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.len()
    }

    /// 揭示下一个字符
    ///
    /// 返回 `true` 表示还有未揭示的字符。
    pub fn tick(&mut self) -> bool {
        if !self.is_complete() {
            self.revealed += 1;
        }
        !self.is_complete()
    }

    /// 重新开始
    pub fn reset(&mut self) {
        self.revealed = 0;
    }

    /// 当前输出：已揭示前缀 + 等长乱码
    pub fn output<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out: String = self.text.chars().take(self.revealed).collect();
        out.push_str(&scramble(self.len() - self.revealed.min(self.len()), rng));
        out
    }
}
