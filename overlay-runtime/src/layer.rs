//! # Layer 模块
//!
//! 定义三个固定优先级的图层槽位以及图层的可见性状态。
//!
//! ## 优先级
//!
//! ```text
//! Foreground  >  Midground  >  Background
//!   (0)            (1)           (2)      <- index
//! ```
//!
//! 图层数量固定为 3，生命周期内不创建、不销毁。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LayerError;

/// 图层数量
pub const LAYER_COUNT: usize = 3;

/// 图层标识
///
/// 变体顺序即优先级顺序（从高到低）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LayerId {
    /// 前景层（突发提醒等，最高优先级）
    Foreground,
    /// 中景层（事件时间线等）
    Midground,
    /// 背景层（常驻小组件，最低优先级）
    Background,
}

impl LayerId {
    /// 所有图层，按优先级从高到低排列
    pub const ALL: [LayerId; LAYER_COUNT] = [Self::Foreground, Self::Midground, Self::Background];

    /// 槽位索引（0 为最高优先级）
    pub fn index(self) -> usize {
        match self {
            Self::Foreground => 0,
            Self::Midground => 1,
            Self::Background => 2,
        }
    }

    /// 是否严格高于另一个图层
    pub fn outranks(self, other: LayerId) -> bool {
        self.index() < other.index()
    }

    /// 严格低于本图层的所有图层（从高到低）
    pub fn lower(self) -> impl Iterator<Item = LayerId> {
        Self::ALL.into_iter().filter(move |other| self.outranks(*other))
    }

    /// 严格高于本图层的所有图层（从高到低）
    pub fn higher(self) -> impl Iterator<Item = LayerId> {
        Self::ALL.into_iter().filter(move |other| other.outranks(self))
    }

    /// 名称（小写）
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Midground => "midground",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerId {
    type Err = LayerError;

    /// 从字符串解析图层（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foreground" => Ok(Self::Foreground),
            "midground" => Ok(Self::Midground),
            "background" => Ok(Self::Background),
            _ => Err(LayerError::UnknownLayer {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LayerId {
    type Error = LayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<usize> for LayerId {
    type Error = LayerError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(LayerError::IndexOutOfRange { index })
    }
}

/// 图层状态
///
/// # 状态转换
///
/// ```text
/// Hidden ──Show──► Entering ──enter 完成──► Active ──Hide──► Exiting ──exit 完成──► Hidden
///                     │                      │  ▲
///                     │                 级联中断 │ 级联恢复
///                     │                      ▼  │
///                     └──── 级联中断 ────► Interrupted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerState {
    /// 未占用
    #[default]
    Hidden,
    /// 正在进入（入场动画进行中）
    Entering,
    /// 正常显示
    Active,
    /// 被更高优先级图层中断（内容保留，等待恢复）
    Interrupted,
    /// 正在退出（退场动画进行中）
    Exiting,
}

impl LayerState {
    /// 写到渲染目标上的状态标记
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Entering => "entering",
            Self::Active => "active",
            Self::Interrupted => "interrupted",
            Self::Exiting => "exiting",
        }
    }

    /// 是否可见（Hidden / Exiting 以外）
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden | Self::Exiting)
    }

    /// 是否占用图层（Entering / Active / Interrupted）
    pub fn is_occupying(self) -> bool {
        matches!(self, Self::Entering | Self::Active | Self::Interrupted)
    }

    /// 是否压制更低的图层（Entering / Active）
    pub fn is_covering(self) -> bool {
        matches!(self, Self::Entering | Self::Active)
    }

    /// 是否处于等待动画完成的过渡态
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
