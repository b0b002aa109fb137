//! # Config 模块
//!
//! 运行时参数。所有字段都带默认值，可直接嵌入 Host 的 `config.json`。
//!
//! 默认值对应 About 页面最完整的版本：
//! 名字 "Haitham" + "Iswed"（共 12 个字符），5 个阶段，第 2 阶段开始分离。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, RevealResult};

/// H / I 分离进度曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementCurve {
    /// 按 `stage / activation_stage` 线性推进
    #[default]
    Linear,
    /// 未达到激活阶段时为 0，达到后为 1
    Step,
}

impl EngagementCurve {
    /// 计算分离进度（0.0 - 1.0）
    pub fn fraction(&self, stage: u32, activation_stage: u32) -> f32 {
        if activation_stage == 0 || stage >= activation_stage {
            return 1.0;
        }
        match self {
            EngagementCurve::Linear => stage as f32 / activation_stage as f32,
            EngagementCurve::Step => 0.0,
        }
    }
}

/// 揭示序列配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 左侧名字（以 H 开头）
    #[serde(default = "default_left_name")]
    pub left_name: String,

    /// 右侧名字（以 I 开头）
    #[serde(default = "default_right_name")]
    pub right_name: String,

    /// 最大阶段
    #[serde(default = "default_max_stage")]
    pub max_stage: u32,

    /// 进入"分离"状态所需的阶段
    #[serde(default = "default_activation_stage")]
    pub activation_stage: u32,

    /// 分离进度曲线
    #[serde(default)]
    pub engagement: EngagementCurve,

    /// 逐字揭示的间隔（毫秒）
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// 每推进一个阶段需要累积的滚动量
    #[serde(default = "default_stage_threshold")]
    pub stage_threshold: f64,
}

/// 滚动锁配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// 揭示完成后到解锁之间的停顿（毫秒）
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// 回到顶部吸附后的冷却时间（毫秒）
    #[serde(default = "default_snap_cooldown_ms")]
    pub snap_cooldown_ms: u64,

    /// 滚动超过视口高度的该比例时显示第二区块
    #[serde(default = "default_section_reveal_ratio")]
    pub section_reveal_ratio: f64,

    /// 向上滚动低于视口高度的该比例时吸附回顶部
    #[serde(default = "default_snap_ratio")]
    pub snap_ratio: f64,

    /// 解锁后滚动到的区块 id
    #[serde(default = "default_target_section")]
    pub target_section: String,
}

/// 第二区块配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// 区块标题，区块首次出现时以解密效果显示
    #[serde(default = "default_section_title")]
    pub title: String,

    /// 标题解密间隔（毫秒）
    #[serde(default = "default_title_interval_ms")]
    pub title_interval_ms: u64,
}

/// 运行时完整配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub reveal: RevealConfig,

    #[serde(default)]
    pub lock: LockConfig,

    #[serde(default)]
    pub section: SectionConfig,
}

fn default_left_name() -> String {
    "Haitham".to_string()
}

fn default_right_name() -> String {
    "Iswed".to_string()
}

fn default_max_stage() -> u32 {
    5
}

fn default_activation_stage() -> u32 {
    2
}

fn default_tick_interval_ms() -> u64 {
    80
}

fn default_stage_threshold() -> f64 {
    40.0
}

fn default_settle_delay_ms() -> u64 {
    400
}

fn default_snap_cooldown_ms() -> u64 {
    1000
}

fn default_section_reveal_ratio() -> f64 {
    0.5
}

fn default_snap_ratio() -> f64 {
    0.2
}

fn default_target_section() -> String {
    "about-details".to_string()
}

fn default_section_title() -> String {
    "about".to_string()
}

fn default_title_interval_ms() -> u64 {
    50
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            left_name: default_left_name(),
            right_name: default_right_name(),
            max_stage: default_max_stage(),
            activation_stage: default_activation_stage(),
            engagement: EngagementCurve::default(),
            tick_interval_ms: default_tick_interval_ms(),
            stage_threshold: default_stage_threshold(),
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            snap_cooldown_ms: default_snap_cooldown_ms(),
            section_reveal_ratio: default_section_reveal_ratio(),
            snap_ratio: default_snap_ratio(),
            target_section: default_target_section(),
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            title: default_section_title(),
            title_interval_ms: default_title_interval_ms(),
        }
    }
}

impl RevealConfig {
    /// 简化版本：两个阶段，达到第 1 阶段即完全分离
    pub fn simple() -> Self {
        Self {
            max_stage: 2,
            activation_stage: 1,
            engagement: EngagementCurve::Step,
            ..Self::default()
        }
    }

    /// 名字总字符数
    pub fn total_chars(&self) -> usize {
        self.left_name.chars().count() + self.right_name.chars().count()
    }

    /// 左侧名字字符数
    pub fn left_len(&self) -> usize {
        self.left_name.chars().count()
    }

    /// 逐字揭示间隔
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> RevealResult<()> {
        if self.left_name.is_empty() {
            return Err(ConfigError::EmptyName { field: "left_name" });
        }
        if self.right_name.is_empty() {
            return Err(ConfigError::EmptyName {
                field: "right_name",
            });
        }
        if self.max_stage == 0 {
            return Err(ConfigError::InvalidMaxStage);
        }
        if self.activation_stage == 0 || self.activation_stage > self.max_stage {
            return Err(ConfigError::InvalidActivationStage {
                actual: self.activation_stage,
                max_stage: self.max_stage,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "tick_interval_ms",
            });
        }
        if !self.stage_threshold.is_finite() || self.stage_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                field: "stage_threshold",
                value: self.stage_threshold,
            });
        }
        Ok(())
    }
}

impl LockConfig {
    /// 解锁前停顿
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// 吸附冷却
    pub fn snap_cooldown(&self) -> Duration {
        Duration::from_millis(self.snap_cooldown_ms)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> RevealResult<()> {
        if self.snap_cooldown_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "snap_cooldown_ms",
            });
        }
        check_ratio("section_reveal_ratio", self.section_reveal_ratio)?;
        check_ratio("snap_ratio", self.snap_ratio)?;
        if self.target_section.trim().is_empty() {
            return Err(ConfigError::EmptyTargetSection);
        }
        Ok(())
    }
}

impl SectionConfig {
    /// 标题解密间隔
    pub fn title_interval(&self) -> Duration {
        Duration::from_millis(self.title_interval_ms)
    }
}

impl RuntimeConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> RevealResult<()> {
        self.reveal.validate()?;
        self.lock.validate()?;
        if self.section.title_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "title_interval_ms",
            });
        }
        Ok(())
    }
}

fn check_ratio(field: &'static str, value: f64) -> RevealResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.reveal.total_chars(), 12);
        assert_eq!(config.reveal.left_len(), 7);
        assert_eq!(config.reveal.max_stage, 5);
        assert_eq!(config.reveal.tick_interval(), Duration::from_millis(80));
        assert_eq!(config.lock.settle_delay(), Duration::from_millis(400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{ "reveal": { "max_stage": 3 } }"#).unwrap();
        assert_eq!(config.reveal.max_stage, 3);
        assert_eq!(config.reveal.left_name, "Haitham");
        assert_eq!(config.lock.target_section, "about-details");
    }

    #[test]
    fn test_engagement_curve() {
        assert_eq!(EngagementCurve::Linear.fraction(0, 2), 0.0);
        assert_eq!(EngagementCurve::Linear.fraction(1, 2), 0.5);
        assert_eq!(EngagementCurve::Linear.fraction(4, 2), 1.0);
        assert_eq!(EngagementCurve::Step.fraction(0, 1), 0.0);
        assert_eq!(EngagementCurve::Step.fraction(1, 1), 1.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RuntimeConfig::default();

        config.reveal.activation_stage = 9;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidActivationStage {
                actual: 9,
                max_stage: 5
            })
        );
        config.reveal.activation_stage = 2;

        config.reveal.right_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyName { field: "right_name" })
        ));
        config.reveal.right_name = "Iswed".to_string();

        config.lock.snap_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio { .. })
        ));
        config.lock.snap_ratio = 0.2;

        config.reveal.stage_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_simple_preset() {
        let simple = RevealConfig::simple();
        assert_eq!(simple.max_stage, 2);
        assert_eq!(simple.engagement, EngagementCurve::Step);
        assert!(simple.validate().is_ok());
    }
}
