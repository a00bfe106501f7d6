//! # Pending 模块
//!
//! 渲染目标挂载之前收到的指令缓冲区。
//!
//! - 每个图层一个槽位，后写覆盖先写，不保留历史
//! - 注册时取出一次并重放，取出即清空

use crate::command::LayerCommand;
use crate::layer::{LAYER_COUNT, LayerId};

/// 待处理指令队列
#[derive(Debug, Clone)]
pub struct PendingCommands<C> {
    slots: [Option<LayerCommand<C>>; LAYER_COUNT],
}

impl<C> Default for PendingCommands<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PendingCommands<C> {
    /// 创建空队列
    pub fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    /// 记录指令（覆盖已有指令）
    pub fn enqueue(&mut self, layer: LayerId, command: LayerCommand<C>) {
        self.slots[layer.index()] = Some(command);
    }

    /// 取出并清空
    pub fn drain(&mut self, layer: LayerId) -> Option<LayerCommand<C>> {
        self.slots[layer.index()].take()
    }

    /// 丢弃指令
    pub fn clear(&mut self, layer: LayerId) {
        self.slots[layer.index()] = None;
    }

    /// 是否有指令
    pub fn has(&self, layer: LayerId) -> bool {
        self.slots[layer.index()].is_some()
    }
}
