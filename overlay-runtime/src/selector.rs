//! # Selector 模块
//!
//! 内容选择器：把一份完整的候选内容快照归约为每个图层至多一项。
//!
//! ## 选择规则
//!
//! 1. 按是否显式指定目标图层分为两组
//! 2. Foreground / Midground：只在显式指定该图层的候选中选，
//!    优先级最高者胜出，同优先级取输入中靠前的
//! 3. Background：有显式候选时同规则 2；否则在未指定图层的候选中，
//!    取类型属于常驻白名单、时间戳最新的一项
//! 4. Midground 没有显式候选时，用最近 N 条未指定图层的候选合成一个
//!    低优先级的聚合项（永远不会覆盖显式指定）
//!
//! `select` 是输入列表的纯函数，重复调用结果相同。

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CandidateError;
use crate::layer::LayerId;

/// 聚合项的类型名
pub const AGGREGATE_KIND: &str = "recent_events";

/// 聚合项的优先级
pub const AGGREGATE_PRIORITY: f64 = -1.0;

/// 默认聚合窗口大小
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// 默认的常驻内容类型白名单
pub const DEFAULT_AMBIENT_TYPES: &[&str] = &[
    "emote_stats",
    "follower",
    "subscription",
    "cheer",
    "raid",
    "now_playing",
];

/// 候选内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCandidate {
    /// 内容类型
    #[serde(rename = "type")]
    pub kind: String,
    /// 内容载荷（不解读）
    #[serde(default)]
    pub data: Value,
    /// 优先级（越大越重要）
    pub priority: f64,
    /// 显式目标图层
    #[serde(default, alias = "target_layer", skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
    /// 时间戳（毫秒），缺省为 0
    #[serde(default)]
    pub timestamp: u64,
}

impl ContentCandidate {
    /// 创建未指定图层的候选
    pub fn new(kind: impl Into<String>, data: Value, priority: f64, timestamp: u64) -> Self {
        Self {
            kind: kind.into(),
            data,
            priority,
            layer: None,
            timestamp,
        }
    }

    /// 指定目标图层
    pub fn on_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    /// 是否显式指定了图层
    pub fn is_targeted(&self) -> bool {
        self.layer.is_some()
    }

    /// 从原始记录解析
    ///
    /// `index` 只用于错误信息定位。
    pub fn from_value(index: usize, record: &Value) -> Result<Self, CandidateError> {
        let candidate =
            ContentCandidate::deserialize(record).map_err(|e| CandidateError::Malformed {
                index,
                message: e.to_string(),
            })?;

        if !candidate.priority.is_finite() {
            return Err(CandidateError::InvalidPriority {
                index,
                priority: candidate.priority,
            });
        }
        Ok(candidate)
    }
}

/// 一批原始记录的解析结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateBatch {
    /// 解析成功的候选（保持输入顺序）
    pub candidates: Vec<ContentCandidate>,
    /// 被丢弃的记录
    pub rejected: Vec<CandidateError>,
}

/// 解析原始记录，丢弃无效项
pub fn parse_candidates(records: &[Value]) -> CandidateBatch {
    let mut batch = CandidateBatch::default();
    for (index, record) in records.iter().enumerate() {
        match ContentCandidate::from_value(index, record) {
            Ok(candidate) => batch.candidates.push(candidate),
            Err(e) => batch.rejected.push(e),
        }
    }
    batch
}

/// 每个图层的选择结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedContent {
    pub foreground: Option<ContentCandidate>,
    pub midground: Option<ContentCandidate>,
    pub background: Option<ContentCandidate>,
}

impl SelectedContent {
    /// 获取某个图层的选择
    pub fn get(&self, layer: LayerId) -> Option<&ContentCandidate> {
        match layer {
            LayerId::Foreground => self.foreground.as_ref(),
            LayerId::Midground => self.midground.as_ref(),
            LayerId::Background => self.background.as_ref(),
        }
    }

    /// 按优先级从高到低遍历
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, Option<&ContentCandidate>)> {
        LayerId::ALL.into_iter().map(|layer| (layer, self.get(layer)))
    }

    /// 是否所有图层都为空
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, c)| c.is_none())
    }
}

/// 选择器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// 可作为背景常驻内容的类型
    #[serde(default = "default_ambient_types")]
    pub ambient_types: Vec<String>,
    /// 中景聚合窗口大小
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_ambient_types() -> Vec<String> {
    DEFAULT_AMBIENT_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            ambient_types: default_ambient_types(),
            window_size: default_window_size(),
        }
    }
}

impl SelectorConfig {
    /// 类型是否在常驻白名单中
    pub fn is_ambient(&self, kind: &str) -> bool {
        self.ambient_types.iter().any(|t| t == kind)
    }
}

/// 内容选择器
#[derive(Debug, Clone, Default)]
pub struct ContentSelector {
    config: SelectorConfig,
}

impl ContentSelector {
    /// 创建选择器
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// 执行选择
    pub fn select(&self, candidates: &[ContentCandidate]) -> SelectedContent {
        let untargeted: Vec<&ContentCandidate> =
            candidates.iter().filter(|c| !c.is_targeted()).collect();

        let foreground = highest_priority(candidates, LayerId::Foreground).cloned();

        let midground = highest_priority(candidates, LayerId::Midground)
            .cloned()
            .or_else(|| self.aggregate(&untargeted));

        let background = highest_priority(candidates, LayerId::Background)
            .or_else(|| {
                most_recent(
                    untargeted
                        .iter()
                        .copied()
                        .filter(|c| self.config.is_ambient(&c.kind)),
                )
            })
            .cloned();

        SelectedContent {
            foreground,
            midground,
            background,
        }
    }

    /// 解析原始记录并执行选择
    pub fn select_records(&self, records: &[Value]) -> (SelectedContent, Vec<CandidateError>) {
        let batch = parse_candidates(records);
        (self.select(&batch.candidates), batch.rejected)
    }

    /// 合成中景聚合项：最近的 N 条未指定图层的候选，最新在前
    fn aggregate(&self, untargeted: &[&ContentCandidate]) -> Option<ContentCandidate> {
        if self.config.window_size == 0 || untargeted.is_empty() {
            return None;
        }

        let mut recent = untargeted.to_vec();
        // 稳定排序：时间戳相同时保持输入顺序
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(self.config.window_size);

        let newest = recent.first().map(|c| c.timestamp).unwrap_or_default();
        let events: Vec<Value> = recent
            .iter()
            .map(|c| {
                json!({
                    "type": c.kind,
                    "data": c.data,
                    "timestamp": c.timestamp,
                })
            })
            .collect();

        Some(
            ContentCandidate::new(AGGREGATE_KIND, Value::Array(events), AGGREGATE_PRIORITY, newest)
                .on_layer(LayerId::Midground),
        )
    }
}

/// 显式指定某图层的候选中优先级最高者（同优先级取靠前的）
fn highest_priority(candidates: &[ContentCandidate], layer: LayerId) -> Option<&ContentCandidate> {
    candidates
        .iter()
        .filter(|c| c.layer == Some(layer))
        .fold(None, |best, c| match best {
            Some(b) if c.priority <= b.priority => Some(b),
            _ => Some(c),
        })
}

/// 时间戳最新者（相同时取靠前的）
fn most_recent<'a>(
    candidates: impl Iterator<Item = &'a ContentCandidate>,
) -> Option<&'a ContentCandidate> {
    candidates.fold(None, |best, c| match best {
        Some(b) if c.timestamp <= b.timestamp => Some(b),
        _ => Some(c),
    })
}
