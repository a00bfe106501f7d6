//! # Session 模块
//!
//! 每个图层一个动画会话：注册时创建，注销时销毁。
//!
//! 动画协作方拿到的是 [`TransitionToken`]（图层 + 会话 + 代数），
//! 完成回调回来时与图层当前的会话和代数比对，任何一项不匹配都说明
//! 回调已经过期（图层被重新中断、隐藏或重新注册过），直接忽略。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layer::LayerId;

/// 动画会话 ID
///
/// 由协调器在注册时分配，单调递增，不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// 图层动画会话
///
/// 记录会话 ID 和当前过渡代数。每次状态转换代数 +1，
/// 之前签发的令牌随之失效。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSession {
    id: SessionId,
    generation: u64,
}

impl AnimationSession {
    /// 打开新会话
    pub(crate) fn open(id: SessionId) -> Self {
        Self { id, generation: 0 }
    }

    /// 会话 ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// 当前代数
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 开始一次新的过渡，返回对应令牌
    pub(crate) fn advance(&mut self, layer: LayerId) -> TransitionToken {
        self.generation += 1;
        self.token(layer)
    }

    /// 当前过渡的令牌
    pub(crate) fn token(&self, layer: LayerId) -> TransitionToken {
        TransitionToken {
            layer,
            session: self.id,
            generation: self.generation,
        }
    }

    /// 令牌是否指向本会话的当前过渡
    pub fn is_current(&self, token: &TransitionToken) -> bool {
        token.session == self.id && token.generation == self.generation
    }
}

/// 过渡令牌
///
/// 随 [`crate::AnimationIntent`] 交给动画协作方，
/// 动画完成后原样交回 `complete_transition`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionToken {
    /// 所属图层
    pub layer: LayerId,
    /// 签发时的会话
    pub session: SessionId,
    /// 签发时的代数
    pub generation: u64,
}

impl fmt::Display for TransitionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.layer, self.session, self.generation)
    }
}
