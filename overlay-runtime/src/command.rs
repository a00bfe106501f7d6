//! # Command 模块
//!
//! 定义进入协调器的图层指令，以及协调器交给动画协作方的动画意图。
//!
//! ## 设计原则
//!
//! - **声明式**：意图描述"从哪个状态到哪个状态"，不描述怎么动
//! - **无副作用**：协调器只产出意图，从不执行
//! - **内容不透明**：载荷 `C` 原样传递，状态机不解读

use serde::{Deserialize, Serialize};

use crate::layer::{LayerId, LayerState};
use crate::session::TransitionToken;

/// 图层指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerCommand<C> {
    /// 显示内容
    Show(C),
    /// 隐藏图层
    Hide,
}

/// 动画意图类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// 开始入场动画（完成后需回调）
    StartEnter,
    /// 开始退场动画（完成后需回调）
    StartExit,
    /// 开始中断动画（被更高优先级图层压下）
    StartInterrupt,
    /// 开始恢复动画（从中断中恢复）
    StartResume,
    /// 状态不变，只把新内容交给渲染目标
    RefreshContent,
}

impl IntentKind {
    /// 该动画完成时协调器是否需要收到回调
    ///
    /// 只有 Entering / Exiting 两个过渡态依赖完成回调推进。
    pub fn needs_completion(self) -> bool {
        matches!(self, Self::StartEnter | Self::StartExit)
    }
}

/// 动画意图
///
/// 协调器交给动画协作方的一次视觉过渡请求。
/// 协作方执行完成后，把 `token` 交回 `complete_transition`。
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationIntent<T, C> {
    /// 意图类型
    pub kind: IntentKind,
    /// 图层
    pub layer: LayerId,
    /// 渲染目标句柄
    pub target: T,
    /// 起始状态
    pub from: LayerState,
    /// 目标状态
    pub to: LayerState,
    /// 图层当前内容
    pub content: Option<C>,
    /// 过渡令牌
    pub token: TransitionToken,
}
