//! # Registry 模块
//!
//! 图层登记表：三个固定槽位，记录渲染目标、状态、内容和动画会话。
//!
//! 未挂载渲染目标的槽位始终报告 Hidden。

use crate::layer::{LAYER_COUNT, LayerId, LayerState};
use crate::session::{AnimationSession, SessionId, TransitionToken};

/// 渲染目标
///
/// 外部持有的"图层画在哪里"的句柄。协调器只保存它，
/// 并在状态变化时写入一个状态标记供样式钩子使用，不做任何绘制。
///
/// 句柄需要可克隆（通常是 `Rc` 包装），因为每个动画意图都带一份。
pub trait RenderTarget: Clone {
    /// 写入状态标记
    fn set_status(&self, status: LayerState);
}

/// 单个图层槽位
#[derive(Debug, Clone)]
pub struct LayerSlot<T, C> {
    target: Option<T>,
    state: LayerState,
    content: Option<C>,
    session: Option<AnimationSession>,
}

impl<T, C> LayerSlot<T, C> {
    fn empty() -> Self {
        Self {
            target: None,
            state: LayerState::Hidden,
            content: None,
            session: None,
        }
    }

    /// 渲染目标
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// 当前状态
    pub fn state(&self) -> LayerState {
        if self.target.is_some() {
            self.state
        } else {
            LayerState::Hidden
        }
    }

    /// 最近一次交付的内容
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// 动画会话
    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    /// 是否已挂载
    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }
}

/// 图层登记表
#[derive(Debug, Clone)]
pub struct LayerRegistry<T, C> {
    slots: [LayerSlot<T, C>; LAYER_COUNT],
    next_session: u64,
}

impl<T, C> Default for LayerRegistry<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> LayerRegistry<T, C> {
    /// 创建登记表（三个空槽位）
    pub fn new() -> Self {
        Self {
            slots: [LayerSlot::empty(), LayerSlot::empty(), LayerSlot::empty()],
            next_session: 1,
        }
    }

    /// 获取槽位
    pub fn slot(&self, layer: LayerId) -> &LayerSlot<T, C> {
        &self.slots[layer.index()]
    }

    fn slot_mut(&mut self, layer: LayerId) -> &mut LayerSlot<T, C> {
        &mut self.slots[layer.index()]
    }

    /// 当前状态
    pub fn state(&self, layer: LayerId) -> LayerState {
        self.slot(layer).state()
    }

    /// 所有图层的状态（按优先级从高到低）
    pub fn states(&self) -> [LayerState; LAYER_COUNT] {
        LayerId::ALL.map(|layer| self.state(layer))
    }

    /// 是否已挂载
    pub fn is_attached(&self, layer: LayerId) -> bool {
        self.slot(layer).is_attached()
    }

    /// 替换内容
    pub fn set_content(&mut self, layer: LayerId, content: Option<C>) {
        self.slot_mut(layer).content = content;
    }

    /// 当前过渡的令牌
    pub fn current_token(&self, layer: LayerId) -> Option<TransitionToken> {
        self.slot(layer).session.as_ref().map(|s| s.token(layer))
    }

    /// 令牌是否仍然有效
    pub fn is_current(&self, token: &TransitionToken) -> bool {
        self.slot(token.layer)
            .session
            .as_ref()
            .is_some_and(|s| s.is_current(token))
    }
}

impl<T: RenderTarget, C> LayerRegistry<T, C> {
    /// 挂载渲染目标
    ///
    /// 打开新的动画会话，状态确认为 Hidden 并写入状态标记。
    /// 已有的目标会被替换，旧会话签发的令牌全部失效。
    pub fn attach(&mut self, layer: LayerId, target: T) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let slot = self.slot_mut(layer);
        target.set_status(LayerState::Hidden);
        slot.target = Some(target);
        slot.state = LayerState::Hidden;
        slot.content = None;
        slot.session = Some(AnimationSession::open(id));
        id
    }

    /// 卸载渲染目标
    ///
    /// 清空目标、内容和会话，复位为 Hidden，卸下的目标上写回 hidden 标记。
    /// 返回被卸下的目标。
    pub fn detach(&mut self, layer: LayerId) -> Option<T> {
        let slot = self.slot_mut(layer);
        slot.state = LayerState::Hidden;
        slot.content = None;
        slot.session = None;
        let target = slot.target.take()?;
        target.set_status(LayerState::Hidden);
        Some(target)
    }

    /// 记录一次状态转换
    ///
    /// 推进会话代数并写入状态标记，返回新过渡的令牌。
    /// 未挂载的图层返回 None 且不做任何修改。
    pub fn transition(&mut self, layer: LayerId, next: LayerState) -> Option<TransitionToken> {
        let slot = self.slot_mut(layer);
        let target = slot.target.as_ref()?;
        let session = slot.session.as_mut()?;

        target.set_status(next);
        slot.state = next;
        if next == LayerState::Hidden {
            slot.content = None;
        }
        Some(session.advance(layer))
    }
}
