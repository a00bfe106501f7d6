//! # Orchestrator 模块
//!
//! 图层协调器门面，组合登记表、待处理指令、状态机和级联解析。
//!
//! ## 执行模型
//!
//! ```text
//! show / hide / register ──► 状态机 ──► 级联 ──► Vec<AnimationIntent>
//!                                                     │
//!           complete_transition(token) ◄── 动画协作方 ◄┘
//! ```
//!
//! 所有操作同步执行，彼此原子。唯一的异步边界是动画完成回调，
//! 回调到达时按当前会话与代数校验，过期的回调直接忽略。

use std::fmt;

use crate::cascade::{self, LayerView};
use crate::command::{AnimationIntent, IntentKind, LayerCommand};
use crate::diagnostic::{LayerSnapshot, OrchestratorSnapshot};
use crate::layer::{LayerId, LayerState};
use crate::machine::{self, Context, LayerEvent};
use crate::observer::{ChangeCause, LayerChange, LayerObserver, ObserverId, ObserverList};
use crate::pending::PendingCommands;
use crate::registry::{LayerRegistry, RenderTarget};
use crate::selector::{ContentCandidate, SelectedContent};
use crate::session::TransitionToken;

/// 协调器产出的动画意图
pub type Intents<T, C> = Vec<AnimationIntent<T, C>>;

/// 完成回调的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// 已推进到新状态
    Applied(LayerState),
    /// 令牌已过期（图层已发生新的过渡或重新注册），忽略
    Stale,
    /// 令牌有效但当前状态不需要完成回调（中断/恢复动画）
    Ignored,
}

/// 图层协调器
///
/// - `T`：渲染目标句柄
/// - `C`：内容载荷，状态机不解读
pub struct LayerOrchestrator<T, C = ContentCandidate> {
    registry: LayerRegistry<T, C>,
    pending: PendingCommands<C>,
    observers: ObserverList,
}

impl<T, C> fmt::Debug for LayerOrchestrator<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerOrchestrator")
            .field("states", &self.registry.states())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T: RenderTarget, C: Clone> Default for LayerOrchestrator<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RenderTarget, C: Clone> LayerOrchestrator<T, C> {
    /// 创建协调器，三个图层均为 Hidden 且未挂载
    pub fn new() -> Self {
        Self {
            registry: LayerRegistry::new(),
            pending: PendingCommands::new(),
            observers: ObserverList::new(),
        }
    }

    // ========== 注册 ==========

    /// 挂载渲染目标
    ///
    /// 先取出待处理指令，再挂载目标并确认 Hidden，最后重放取出的指令。
    /// 注册前发出的 Show 因此得到一次干净的 Hidden → Entering 转换。
    /// 重复注册等同于先注销再注册。
    pub fn register_layer(&mut self, layer: LayerId, target: T) -> Intents<T, C> {
        let mut intents = Vec::new();
        let replay = self.pending.drain(layer);

        if self.registry.is_attached(layer) {
            self.detach(layer, &mut intents);
        }
        self.registry.attach(layer, target);

        if let Some(LayerCommand::Show(content)) = replay {
            self.registry.set_content(layer, Some(content));
            self.dispatch(layer, LayerEvent::Show, ChangeCause::Replay, &mut intents);
        }
        intents
    }

    /// 卸载渲染目标
    ///
    /// 硬复位为 Hidden：丢弃目标、待处理指令、内容和动画会话，
    /// 不为该图层产生任何意图。它压制的更低图层按级联规则恢复，
    /// 返回的意图只属于被恢复的图层。
    pub fn unregister_layer(&mut self, layer: LayerId) -> Intents<T, C> {
        let mut intents = Vec::new();
        self.pending.clear(layer);
        self.detach(layer, &mut intents);
        intents
    }

    fn detach(&mut self, layer: LayerId, intents: &mut Intents<T, C>) {
        let from = self.registry.state(layer);
        if self.registry.detach(layer).is_none() {
            return;
        }
        if from != LayerState::Hidden {
            self.observers.notify(&LayerChange {
                layer,
                from,
                to: LayerState::Hidden,
                cause: ChangeCause::Unregister,
            });
        }
        if from.is_covering() {
            self.restore_below(layer, intents);
        }
    }

    // ========== 指令 ==========

    /// 显示内容
    ///
    /// 未挂载的图层只记录为待处理指令（覆盖之前的指令）。
    /// 已占用的图层状态不变时只替换内容，产出一个 `RefreshContent` 意图，
    /// 不推进代数。
    pub fn show_layer(&mut self, layer: LayerId, content: C) -> Intents<T, C> {
        let mut intents = Vec::new();
        if !self.registry.is_attached(layer) {
            self.pending.enqueue(layer, LayerCommand::Show(content));
            return intents;
        }

        let from = self.registry.state(layer);
        self.registry.set_content(layer, Some(content));
        self.dispatch(layer, LayerEvent::Show, ChangeCause::Command, &mut intents);

        if intents.is_empty() && from.is_occupying() {
            if let Some(token) = self.registry.current_token(layer) {
                let kind = IntentKind::RefreshContent;
                self.push_intent(kind, layer, from, from, token, &mut intents);
            }
        }
        intents
    }

    /// 隐藏图层
    ///
    /// 未挂载的图层只记录为待处理指令（覆盖之前的 Show）。
    pub fn hide_layer(&mut self, layer: LayerId) -> Intents<T, C> {
        let mut intents = Vec::new();
        if !self.registry.is_attached(layer) {
            self.pending.enqueue(layer, LayerCommand::Hide);
            return intents;
        }

        self.dispatch(layer, LayerEvent::Hide, ChangeCause::Command, &mut intents);
        intents
    }

    /// 执行一条图层指令
    pub fn execute(&mut self, layer: LayerId, command: LayerCommand<C>) -> Intents<T, C> {
        match command {
            LayerCommand::Show(content) => self.show_layer(layer, content),
            LayerCommand::Hide => self.hide_layer(layer),
        }
    }

    // ========== 完成回调 ==========

    /// 动画完成回调
    ///
    /// 只有会话与代数都匹配当前过渡、且图层处于 Entering / Exiting 时才推进；
    /// 其余情况都是安全的空操作，不会让状态回退。
    pub fn complete_transition(&mut self, token: TransitionToken) -> CompletionOutcome {
        if !self.registry.is_current(&token) {
            return CompletionOutcome::Stale;
        }

        let state = self.registry.state(token.layer);
        if !state.is_transitioning() {
            return CompletionOutcome::Ignored;
        }
        let event = if state == LayerState::Entering {
            LayerEvent::EnterComplete
        } else {
            LayerEvent::ExitComplete
        };

        // Entering → Active、Exiting → Hidden 都不改变压制关系，不会产生级联意图
        let mut intents = Vec::new();
        self.dispatch(token.layer, event, ChangeCause::Completion, &mut intents);
        CompletionOutcome::Applied(self.registry.state(token.layer))
    }

    /// 强制完成图层当前的过渡
    ///
    /// 用于动画协作方永远不回调的情况，避免图层卡在 Entering / Exiting。
    pub fn settle_layer(&mut self, layer: LayerId) -> CompletionOutcome {
        match self.registry.current_token(layer) {
            Some(token) => self.complete_transition(token),
            None => CompletionOutcome::Ignored,
        }
    }

    // ========== 查询 ==========

    /// 图层状态
    pub fn layer_state(&self, layer: LayerId) -> LayerState {
        self.registry.state(layer)
    }

    /// 图层是否可见（Hidden / Exiting 以外）
    pub fn is_layer_visible(&self, layer: LayerId) -> bool {
        self.layer_state(layer).is_visible()
    }

    /// 图层当前内容
    pub fn content(&self, layer: LayerId) -> Option<&C> {
        self.registry.slot(layer).content()
    }

    /// 图层的渲染目标
    pub fn target(&self, layer: LayerId) -> Option<&T> {
        self.registry.slot(layer).target()
    }

    /// 是否已挂载
    pub fn is_attached(&self, layer: LayerId) -> bool {
        self.registry.is_attached(layer)
    }

    /// 是否有待处理指令
    pub fn has_pending(&self, layer: LayerId) -> bool {
        self.pending.has(layer)
    }

    /// 诊断快照
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        let layers = LayerId::ALL
            .into_iter()
            .map(|layer| {
                let slot = self.registry.slot(layer);
                LayerSnapshot {
                    layer,
                    state: slot.state(),
                    attached: slot.is_attached(),
                    pending: self.pending.has(layer),
                    has_content: slot.content().is_some(),
                    session: slot.session().map(|s| s.id()),
                    generation: slot.session().map(|s| s.generation()).unwrap_or(0),
                }
            })
            .collect();
        OrchestratorSnapshot { layers }
    }

    // ========== 观察者 ==========

    /// 订阅状态变化
    pub fn subscribe(&mut self, observer: impl LayerObserver + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// 退订
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ========== 内部 ==========

    fn view(&self) -> LayerView {
        LayerView {
            states: self.registry.states(),
            attached: LayerId::ALL.map(|layer| self.registry.is_attached(layer)),
        }
    }

    /// 状态机 + 级联
    ///
    /// 状态不变时不推进代数，已签发的令牌保持有效。
    fn dispatch(
        &mut self,
        layer: LayerId,
        event: LayerEvent,
        cause: ChangeCause,
        intents: &mut Intents<T, C>,
    ) {
        let from = self.registry.state(layer);
        let context = Context {
            attached: self.registry.is_attached(layer),
            blocked: self.view().is_blocked(layer),
        };
        let step = machine::apply(from, event, context);
        if step.next == from && step.intent.is_none() {
            return;
        }

        let Some(token) = self.registry.transition(layer, step.next) else {
            return;
        };
        self.observers.notify(&LayerChange {
            layer,
            from,
            to: step.next,
            cause,
        });
        if let Some(kind) = step.intent {
            self.push_intent(kind, layer, from, step.next, token, intents);
        }

        if machine::starts_covering(from, step.next) {
            for lower in cascade::on_enter(layer, &self.view()) {
                self.dispatch(lower, LayerEvent::Interrupt, ChangeCause::Cascade, intents);
            }
        } else if machine::stops_covering(from, step.next) {
            self.restore_below(layer, intents);
        }
    }

    fn restore_below(&mut self, layer: LayerId, intents: &mut Intents<T, C>) {
        if let Some(restored) = cascade::on_exit(layer, &self.view()) {
            self.dispatch(restored, LayerEvent::Resume, ChangeCause::Cascade, intents);
        }
    }

    fn push_intent(
        &self,
        kind: IntentKind,
        layer: LayerId,
        from: LayerState,
        to: LayerState,
        token: TransitionToken,
        intents: &mut Intents<T, C>,
    ) {
        let slot = self.registry.slot(layer);
        if let Some(target) = slot.target() {
            intents.push(AnimationIntent {
                kind,
                layer,
                target: target.clone(),
                from,
                to,
                content: slot.content().cloned(),
                token,
            });
        }
    }
}

impl<T: RenderTarget> LayerOrchestrator<T, ContentCandidate> {
    /// 把选择器的输出落实为 show / hide
    ///
    /// 按优先级从高到低处理，使同一批次里更高图层的进入先于更低图层生效。
    /// 内容未变化的占用中图层不会重新 Show。
    pub fn apply_selection(&mut self, selected: &SelectedContent) -> Intents<T, ContentCandidate> {
        let mut intents = Vec::new();
        for (layer, candidate) in selected.iter() {
            match candidate {
                Some(candidate) => {
                    let unchanged = self.layer_state(layer).is_occupying()
                        && self.content(layer) == Some(candidate);
                    if !unchanged {
                        intents.extend(self.show_layer(layer, candidate.clone()));
                    }
                }
                None => intents.extend(self.hide_layer(layer)),
            }
        }
        intents
    }
}
