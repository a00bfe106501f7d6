//! # Overlay Host
//!
//! 覆盖层协调器的无头宿主实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 读取并回放应用状态快照流
//! - 为图层提供渲染表面
//! - 执行协调器发出的动画意图，并把完成回调交回
//!
//! Host 层不包含图层调度逻辑，调度全部由 `overlay-runtime` 完成。

pub mod animation;
pub mod config;
pub mod host;
pub mod logging;
pub mod replay;
pub mod stream;
pub mod surface;

pub use animation::{AnimationDriver, EasingFunction, LayerAnimation, OverlayIntent};
pub use config::{AnimationConfig, ConfigError, HostConfig};
pub use host::{IngestReport, OverlayHost};
pub use replay::{ReplayOptions, ReplaySummary, replay};
pub use stream::{SnapshotReader, StateSnapshot, StreamError};
pub use surface::OverlaySurface;
