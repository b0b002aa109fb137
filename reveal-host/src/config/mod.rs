//! # Config 模块
//!
//! Host 配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use reveal_runtime::RuntimeConfig;

use crate::error::{HostError, HostResult};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 运行时配置（揭示序列、滚动锁、第二区块）
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// 名字布局配置
    #[serde(default)]
    pub layout: LayoutConfig,

    /// 文档（视口）配置
    #[serde(default)]
    pub document: DocumentConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 名字布局配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// H / I 初始分离的最大位移（像素）
    #[serde(default = "default_hi_max_translate")]
    pub hi_max_translate: f32,

    /// 全名展开的最大位移（像素）
    #[serde(default = "default_name_max_translate")]
    pub name_max_translate: f32,

    /// 背景视差范围（百分比，总幅度）
    #[serde(default = "default_parallax_range")]
    pub parallax_range: f32,
}

/// 文档配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// 视口宽度
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    /// 视口高度
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// 文档总高度
    #[serde(default = "default_content_height")]
    pub content_height: f64,
}

/// 调试配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 每次输入后输出一帧
    #[serde(default)]
    pub log_frames: bool,

    /// 乱码随机种子（不设置则使用系统熵）
    #[serde(default)]
    pub seed: Option<u64>,
}

// 默认值函数
fn default_hi_max_translate() -> f32 {
    60.0
}

fn default_name_max_translate() -> f32 {
    900.0
}

fn default_parallax_range() -> f32 {
    8.0
}

fn default_viewport_width() -> f64 {
    1440.0
}

fn default_viewport_height() -> f64 {
    900.0
}

fn default_content_height() -> f64 {
    1800.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hi_max_translate: default_hi_max_translate(),
            name_max_translate: default_name_max_translate(),
            parallax_range: default_parallax_range(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            content_height: default_content_height(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并输出警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => {
                info!(path = ?path, "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，失败时返回错误
    pub fn load_strict(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| HostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| HostError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> HostResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HostError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| HostError::Io {
            path: PathBuf::from(path),
            message: e.to_string(),
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> HostResult<()> {
        self.runtime.validate()?;

        let doc = &self.document;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(doc.viewport_width) || !positive(doc.viewport_height) {
            return Err(HostError::Validation("视口宽高必须大于 0".to_string()));
        }
        if !doc.content_height.is_finite() || doc.content_height < doc.viewport_height {
            return Err(HostError::Validation(format!(
                "文档高度 {} 不能小于视口高度 {}",
                doc.content_height, doc.viewport_height
            )));
        }

        let layout = &self.layout;
        for (name, value) in [
            ("hi_max_translate", layout.hi_max_translate),
            ("name_max_translate", layout.name_max_translate),
            ("parallax_range", layout.parallax_range),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HostError::Validation(format!(
                    "布局参数 {name} 无效: {value}"
                )));
            }
        }

        Ok(())
    }
}
