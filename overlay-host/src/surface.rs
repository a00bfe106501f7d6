//! # Surface 模块
//!
//! 内存中的渲染表面，作为协调器的渲染目标。
//!
//! 表面只记录"应该画什么"：状态标记、透明度和最近一次交付的内容，
//! 不做任何真实绘制。句柄可克隆，克隆共享同一份数据。

use overlay_runtime::{ContentCandidate, LayerId, LayerState, RenderTarget};
use std::cell::RefCell;
use std::rc::Rc;

/// 表面数据
#[derive(Debug)]
struct SurfaceData {
    layer: LayerId,
    status: LayerState,
    /// 当前透明度 (0.0 - 1.0)
    opacity: f32,
    /// 正在展示的内容
    content: Option<ContentCandidate>,
}

/// 渲染表面句柄
#[derive(Debug, Clone)]
pub struct OverlaySurface {
    data: Rc<RefCell<SurfaceData>>,
}

impl OverlaySurface {
    /// 创建不可见的空表面
    pub fn new(layer: LayerId) -> Self {
        Self {
            data: Rc::new(RefCell::new(SurfaceData {
                layer,
                status: LayerState::Hidden,
                opacity: 0.0,
                content: None,
            })),
        }
    }

    pub fn layer(&self) -> LayerId {
        self.data.borrow().layer
    }

    /// 当前状态标记
    pub fn status(&self) -> LayerState {
        self.data.borrow().status
    }

    pub fn opacity(&self) -> f32 {
        self.data.borrow().opacity
    }

    /// 设置透明度（限制在 0.0 - 1.0）
    pub fn set_opacity(&self, opacity: f32) {
        self.data.borrow_mut().opacity = opacity.clamp(0.0, 1.0);
    }

    /// 当前展示内容的类型
    pub fn content_kind(&self) -> Option<String> {
        self.data.borrow().content.as_ref().map(|c| c.kind.clone())
    }

    /// 当前展示的内容
    pub fn content(&self) -> Option<ContentCandidate> {
        self.data.borrow().content.clone()
    }

    /// 替换展示内容
    pub fn present(&self, content: Option<ContentCandidate>) {
        self.data.borrow_mut().content = content;
    }
}

impl RenderTarget for OverlaySurface {
    fn set_status(&self, status: LayerState) {
        let mut data = self.data.borrow_mut();
        data.status = status;
        // 回到 Hidden 时不再展示任何东西
        if status == LayerState::Hidden {
            data.opacity = 0.0;
            data.content = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_data() {
        let surface = OverlaySurface::new(LayerId::Midground);
        let handle = surface.clone();

        handle.set_status(LayerState::Entering);
        handle.set_opacity(0.4);
        assert_eq!(surface.status(), LayerState::Entering);
        assert_eq!(surface.opacity(), 0.4);
        assert_eq!(OverlaySurface::new(LayerId::Midground).opacity(), 0.0);
    }

    #[test]
    fn test_hidden_clears_surface() {
        let surface = OverlaySurface::new(LayerId::Foreground);
        surface.present(Some(ContentCandidate::new("alert", json!({}), 1.0, 0)));
        surface.set_opacity(2.0);
        assert_eq!(surface.opacity(), 1.0);
        assert_eq!(surface.content_kind().as_deref(), Some("alert"));

        surface.set_status(LayerState::Hidden);
        assert_eq!(surface.opacity(), 0.0);
        assert!(surface.content().is_none());
    }
}
