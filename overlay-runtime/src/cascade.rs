//! # Cascade 模块
//!
//! 优先级级联解析：某个图层开始/停止压制时，计算哪些更低的图层
//! 需要被中断或恢复。
//!
//! 固定全序：Foreground > Midground > Background。
//! 这里只做计算，状态修改由 Orchestrator 通过状态机完成。

use crate::layer::{LAYER_COUNT, LayerId, LayerState};

/// 级联计算所需的图层视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerView {
    /// 各图层状态（按 `LayerId::index()` 排列）
    pub states: [LayerState; LAYER_COUNT],
    /// 各图层是否已挂载
    pub attached: [bool; LAYER_COUNT],
}

impl LayerView {
    /// 图层状态
    pub fn state(&self, layer: LayerId) -> LayerState {
        self.states[layer.index()]
    }

    /// 是否有严格更高的图层处于 Entering / Active
    pub fn is_blocked(&self, layer: LayerId) -> bool {
        layer.higher().any(|h| self.state(h).is_covering())
    }
}

/// 图层开始压制时需要中断的更低图层
///
/// 所有严格更低、处于 Active / Entering 的图层。
pub fn on_enter(layer: LayerId, view: &LayerView) -> Vec<LayerId> {
    layer
        .lower()
        .filter(|lower| view.state(*lower).is_covering())
        .collect()
}

/// 图层停止压制时需要恢复的更低图层
///
/// 从高到低查找第一个已挂载的 Interrupted 图层，最多恢复一个。
/// 该图层上方仍有其他图层压制时不恢复，查找也到此为止。
pub fn on_exit(layer: LayerId, view: &LayerView) -> Option<LayerId> {
    let candidate = layer.lower().find(|lower| {
        view.state(*lower) == LayerState::Interrupted && view.attached[lower.index()]
    })?;

    if view.is_blocked(candidate) {
        None
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LayerState as S;

    fn view(states: [LayerState; 3]) -> LayerView {
        LayerView {
            states,
            attached: [true; 3],
        }
    }

    #[test]
    fn test_on_enter_interrupts_covering_lower_layers() {
        let v = view([S::Entering, S::Active, S::Entering]);
        assert_eq!(
            on_enter(LayerId::Foreground, &v),
            vec![LayerId::Midground, LayerId::Background]
        );

        let v = view([S::Entering, S::Hidden, S::Interrupted]);
        assert!(on_enter(LayerId::Foreground, &v).is_empty());

        // 更高的图层不受影响
        let v = view([S::Active, S::Entering, S::Active]);
        assert_eq!(on_enter(LayerId::Midground, &v), vec![LayerId::Background]);
    }

    #[test]
    fn test_on_exit_restores_first_interrupted() {
        let v = view([S::Exiting, S::Interrupted, S::Interrupted]);
        assert_eq!(on_exit(LayerId::Foreground, &v), Some(LayerId::Midground));

        let v = view([S::Exiting, S::Hidden, S::Interrupted]);
        assert_eq!(on_exit(LayerId::Foreground, &v), Some(LayerId::Background));
    }

    #[test]
    fn test_on_exit_skips_unattached() {
        let v = LayerView {
            states: [S::Exiting, S::Interrupted, S::Interrupted],
            attached: [true, false, true],
        };
        assert_eq!(on_exit(LayerId::Foreground, &v), Some(LayerId::Background));
    }

    #[test]
    fn test_on_exit_respects_remaining_cover() {
        // 中景仍在显示，背景不能恢复
        let v = view([S::Exiting, S::Active, S::Interrupted]);
        assert_eq!(on_exit(LayerId::Foreground, &v), None);

        // 中景退出，但前景还在
        let v = view([S::Active, S::Exiting, S::Interrupted]);
        assert_eq!(on_exit(LayerId::Midground, &v), None);
    }

    #[test]
    fn test_on_exit_without_interrupted() {
        let v = view([S::Exiting, S::Hidden, S::Hidden]);
        assert_eq!(on_exit(LayerId::Foreground, &v), None);
        assert_eq!(on_exit(LayerId::Background, &v), None);
    }
}
