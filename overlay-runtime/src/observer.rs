//! # Observer 模块
//!
//! 显式的观察者列表：图层状态每次变化都手动通知订阅方，
//! 状态机本身不依赖任何响应式运行时。

use std::fmt;

use crate::layer::{LayerId, LayerState};

/// 变化原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCause {
    /// show / hide 指令
    Command,
    /// 优先级级联
    Cascade,
    /// 动画完成回调
    Completion,
    /// 注册时重放待处理指令
    Replay,
    /// 注销复位
    Unregister,
}

/// 图层状态变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerChange {
    pub layer: LayerId,
    pub from: LayerState,
    pub to: LayerState,
    pub cause: ChangeCause,
}

impl fmt::Display for LayerChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {} ({:?})", self.layer, self.from, self.to, self.cause)
    }
}

/// 观察者
pub trait LayerObserver {
    fn on_layer_change(&mut self, change: &LayerChange);
}

impl<F: FnMut(&LayerChange)> LayerObserver for F {
    fn on_layer_change(&mut self, change: &LayerChange) {
        self(change)
    }
}

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// 观察者列表
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<(ObserverId, Box<dyn LayerObserver>)>,
    next_id: u64,
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅，返回用于退订的句柄
    pub fn subscribe(&mut self, observer: impl LayerObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// 退订，返回是否存在该订阅
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// 按订阅顺序通知
    pub fn notify(&mut self, change: &LayerChange) {
        for (_, observer) in &mut self.observers {
            observer.on_layer_change(change);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
