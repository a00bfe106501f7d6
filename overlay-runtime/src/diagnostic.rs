//! # 诊断模块
//!
//! 所有图层状态的只读快照，用于调试面板与日志，不影响行为。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layer::{LayerId, LayerState};
use crate::session::SessionId;

/// 单个图层的诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    /// 图层
    pub layer: LayerId,
    /// 当前状态
    pub state: LayerState,
    /// 是否已挂载渲染目标
    pub attached: bool,
    /// 是否有待处理指令
    pub pending: bool,
    /// 是否持有内容
    pub has_content: bool,
    /// 动画会话（未挂载时为 None）
    pub session: Option<SessionId>,
    /// 当前过渡代数
    pub generation: u64,
}

impl fmt::Display for LayerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.layer, self.state)?;
        match self.session {
            Some(session) => write!(f, " [{} gen {}]", session, self.generation)?,
            None => write!(f, " [detached]")?,
        }
        if self.has_content {
            write!(f, " +content")?;
        }
        if self.pending {
            write!(f, " +pending")?;
        }
        Ok(())
    }
}

/// 协调器诊断快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorSnapshot {
    /// 各图层（按优先级从高到低）
    pub layers: Vec<LayerSnapshot>,
}

impl OrchestratorSnapshot {
    /// 获取某个图层的诊断信息
    pub fn layer(&self, layer: LayerId) -> Option<&LayerSnapshot> {
        self.layers.iter().find(|l| l.layer == layer)
    }

    /// 可见图层数量
    pub fn visible_count(&self) -> usize {
        self.layers.iter().filter(|l| l.state.is_visible()).count()
    }

    /// 有待处理指令的图层数量
    pub fn pending_count(&self) -> usize {
        self.layers.iter().filter(|l| l.pending).count()
    }
}

impl fmt::Display for OrchestratorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", layer)?;
        }
        Ok(())
    }
}
