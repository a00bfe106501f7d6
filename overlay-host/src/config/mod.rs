//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (overlay.json)
//! 3. 默认值（最低）

use overlay_runtime::{IntentKind, LayerId, SelectorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::animation::EasingFunction;

/// 宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 启动时创建渲染表面的图层
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerId>,

    /// 内容选择配置
    #[serde(default)]
    pub selector: SelectorConfig,

    /// 动画配置
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 日志级别（trace / debug / info / warn / error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 动画配置
///
/// 时长单位为秒，真实的视觉节奏由宿主决定，协调器本身不计时。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 入场时长
    #[serde(default = "default_enter_secs")]
    pub enter_secs: f32,

    /// 退场时长
    #[serde(default = "default_exit_secs")]
    pub exit_secs: f32,

    /// 被中断时淡出到的时长
    #[serde(default = "default_interrupt_secs")]
    pub interrupt_secs: f32,

    /// 恢复时长
    #[serde(default = "default_resume_secs")]
    pub resume_secs: f32,

    /// 缓动函数
    #[serde(default)]
    pub easing: EasingFunction,
}

impl AnimationConfig {
    /// 某种动画意图对应的时长
    ///
    /// 内容刷新没有过渡，时长为 0。
    pub fn duration_for(&self, kind: IntentKind) -> f32 {
        match kind {
            IntentKind::StartEnter => self.enter_secs,
            IntentKind::StartExit => self.exit_secs,
            IntentKind::StartInterrupt => self.interrupt_secs,
            IntentKind::StartResume => self.resume_secs,
            IntentKind::RefreshContent => 0.0,
        }
    }
}

// 默认值函数
fn default_layers() -> Vec<LayerId> {
    LayerId::ALL.to_vec()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_enter_secs() -> f32 {
    0.5
}

fn default_exit_secs() -> f32 {
    0.4
}

fn default_interrupt_secs() -> f32 {
    0.25
}

fn default_resume_secs() -> f32 {
    0.25
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            layers: default_layers(),
            selector: SelectorConfig::default(),
            animation: AnimationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enter_secs: default_enter_secs(),
            exit_secs: default_exit_secs(),
            interrupt_secs: default_interrupt_secs(),
            resume_secs: default_resume_secs(),
            easing: EasingFunction::default(),
        }
    }
}

impl HostConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 严格读取配置文件，失败时返回错误
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, layer) in self.layers.iter().enumerate() {
            if self.layers[..i].contains(layer) {
                return Err(ConfigError::ValidationFailed(format!(
                    "图层 {} 重复配置",
                    layer
                )));
            }
        }

        if self.selector.window_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "selector.window_size 必须大于 0".to_string(),
            ));
        }

        let durations = [
            ("enter_secs", self.animation.enter_secs),
            ("exit_secs", self.animation.exit_secs),
            ("interrupt_secs", self.animation.interrupt_secs),
            ("resume_secs", self.animation.resume_secs),
        ];
        for (name, secs) in durations {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "animation.{} 必须是非负数，当前为 {}",
                    name, secs
                )));
            }
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "未知日志级别 '{}'",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 序列化 / 反序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
