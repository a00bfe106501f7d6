//! # Overlay Runtime
//!
//! 直播覆盖层的三图层协调核心。
//!
//! ## 架构概述
//!
//! `overlay-runtime` 是纯逻辑核心，不依赖任何 IO、渲染或动画引擎。
//! 宿主把内容选择的结果和图层指令交给协调器，协调器返回动画意图；
//! 动画结束后宿主把令牌交回：
//!
//! ```text
//! 状态快照 ──► ContentSelector ──► SelectedContent
//!                                        │
//! Host                          LayerOrchestrator
//!   │── register / show / hide ──────►│
//!   │◄── Vec<AnimationIntent> ────────│  状态机 + 级联
//!   │                                  │
//!   │── complete_transition(token) ──►│  过期令牌直接忽略
//! ```
//!
//! ## 图层
//!
//! 固定三层，优先级从高到低：Foreground（提醒）> Midground（汇总）> Background（常驻）。
//! 更高的图层进入时，正在显示的更低图层被中断；它退出时，最近的被中断图层恢复。
//!
//! ## 模块结构
//!
//! - [`layer`]：图层标识与状态
//! - [`machine`]：纯状态转换函数
//! - [`cascade`]：优先级级联解析
//! - [`orchestrator`]：协调器门面
//! - [`selector`]：内容选择
//! - [`registry`] / [`pending`] / [`session`]：协调器内部的账本
//! - [`observer`] / [`diagnostic`]：状态变化通知与诊断快照
//! - [`error`]：错误类型定义

pub mod cascade;
pub mod command;
pub mod diagnostic;
pub mod error;
pub mod layer;
pub mod machine;
pub mod observer;
pub mod orchestrator;
pub mod pending;
pub mod registry;
pub mod selector;
pub mod session;

// 重导出核心类型
pub use cascade::LayerView;
pub use command::{AnimationIntent, IntentKind, LayerCommand};
pub use diagnostic::{LayerSnapshot, OrchestratorSnapshot};
pub use error::{CandidateError, LayerError};
pub use layer::{LAYER_COUNT, LayerId, LayerState};
pub use machine::{Context, LayerEvent, Step};
pub use observer::{ChangeCause, LayerChange, LayerObserver, ObserverId};
pub use orchestrator::{CompletionOutcome, Intents, LayerOrchestrator};
pub use registry::RenderTarget;
pub use selector::{
    AGGREGATE_KIND, AGGREGATE_PRIORITY, CandidateBatch, ContentCandidate, ContentSelector,
    DEFAULT_AMBIENT_TYPES, DEFAULT_WINDOW_SIZE, SelectedContent, SelectorConfig,
    parse_candidates,
};
pub use session::{SessionId, TransitionToken};
