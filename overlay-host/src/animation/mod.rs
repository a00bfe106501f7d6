//! # Animation 模块
//!
//! 动画协作方的参考实现：把协调器产出的动画意图变成透明度时间轴。
//!
//! ## 核心设计
//!
//! - 每个图层同一时刻最多一个动画，新的意图直接替换旧动画
//! - 被替换的旧动画不回调，它的令牌本来就已经过期
//! - 入场 / 退场动画结束后把令牌交回，中断 / 恢复动画静默结束
//! - 内容刷新不创建动画，只替换表面上的内容
//!
//! ```rust,ignore
//! let mut driver = AnimationDriver::new(config.animation.clone());
//! for intent in orchestrator.show_layer(LayerId::Foreground, alert) {
//!     driver.start(intent);
//! }
//! for token in driver.update(dt) {
//!     orchestrator.complete_transition(token);
//! }
//! ```

mod easing;
mod timeline;

pub use easing::EasingFunction;
pub use timeline::{AnimationState, LayerAnimation, target_opacity};

use overlay_runtime::{
    AnimationIntent, ContentCandidate, IntentKind, LAYER_COUNT, LayerId, TransitionToken,
};
use tracing::debug;

use crate::config::AnimationConfig;
use crate::surface::OverlaySurface;

/// 宿主使用的动画意图
pub type OverlayIntent = AnimationIntent<OverlaySurface, ContentCandidate>;

/// 正在运行的图层动画
#[derive(Debug, Clone)]
struct Running {
    surface: OverlaySurface,
    animation: LayerAnimation,
}

/// 动画驱动器
#[derive(Debug)]
pub struct AnimationDriver {
    config: AnimationConfig,
    running: [Option<Running>; LAYER_COUNT],
}

impl AnimationDriver {
    /// 创建驱动器
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            running: [None, None, None],
        }
    }

    /// 开始执行一个动画意图
    ///
    /// 从表面当前的透明度出发，替换该图层上正在运行的动画。
    /// 内容刷新只替换表面上的内容，正在运行的动画继续。
    pub fn start(&mut self, intent: OverlayIntent) {
        let surface = intent.target;
        if intent.kind == IntentKind::RefreshContent {
            debug!(layer = %intent.layer, state = %intent.to, "刷新图层内容");
            surface.present(intent.content);
            return;
        }

        let duration = self.config.duration_for(intent.kind);
        if intent.content.is_some() {
            surface.present(intent.content);
        }

        let animation =
            LayerAnimation::new(intent.kind, intent.token, surface.opacity(), duration)
                .with_easing(self.config.easing);
        debug!(
            layer = %intent.layer,
            kind = ?intent.kind,
            from = %intent.from,
            to = %intent.to,
            duration = duration,
            "开始图层动画"
        );

        self.running[intent.layer.index()] = Some(Running { surface, animation });
    }

    /// 批量开始
    pub fn start_all(&mut self, intents: impl IntoIterator<Item = OverlayIntent>) {
        for intent in intents {
            self.start(intent);
        }
    }

    /// 推进所有动画
    ///
    /// 返回本次结束、需要交回协调器的令牌。
    pub fn update(&mut self, dt: f32) -> Vec<TransitionToken> {
        let mut finished = Vec::new();
        for slot in &mut self.running {
            let Some(running) = slot.as_mut() else {
                continue;
            };
            running.animation.update(dt);
            running.surface.set_opacity(running.animation.current_value());
            if running.animation.is_finished() {
                Self::finish(slot, &mut finished);
            }
        }
        finished
    }

    /// 跳过所有动画，直接到达终点
    pub fn skip_all(&mut self) -> Vec<TransitionToken> {
        let mut finished = Vec::new();
        for slot in &mut self.running {
            if let Some(running) = slot.as_mut() {
                running.animation.skip();
                running.surface.set_opacity(running.animation.current_value());
                Self::finish(slot, &mut finished);
            }
        }
        finished
    }

    fn finish(slot: &mut Option<Running>, finished: &mut Vec<TransitionToken>) {
        if let Some(running) = slot.take() {
            let animation = running.animation;
            debug!(token = %animation.token, kind = ?animation.kind, "图层动画结束");
            if animation.kind.needs_completion() {
                finished.push(animation.token);
            }
        }
    }

    /// 某个图层正在运行的动画
    pub fn animation(&self, layer: LayerId) -> Option<&LayerAnimation> {
        self.running[layer.index()].as_ref().map(|r| &r.animation)
    }

    /// 正在运行的动画数量
    pub fn active_count(&self) -> usize {
        self.running.iter().filter(|r| r.is_some()).count()
    }

    /// 是否没有正在运行的动画
    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_runtime::{CompletionOutcome, LayerOrchestrator, LayerState};
    use serde_json::json;

    fn linear_config() -> AnimationConfig {
        AnimationConfig {
            enter_secs: 1.0,
            exit_secs: 1.0,
            interrupt_secs: 0.5,
            resume_secs: 0.5,
            easing: EasingFunction::Linear,
        }
    }

    fn setup() -> (
        LayerOrchestrator<OverlaySurface>,
        AnimationDriver,
        [OverlaySurface; 3],
    ) {
        let mut orchestrator = LayerOrchestrator::new();
        let surfaces = LayerId::ALL.map(OverlaySurface::new);
        for layer in LayerId::ALL {
            orchestrator.register_layer(layer, surfaces[layer.index()].clone());
        }
        (orchestrator, AnimationDriver::new(linear_config()), surfaces)
    }

    fn alert() -> ContentCandidate {
        ContentCandidate::new("alert", json!({ "user": "a" }), 1.0, 0).on_layer(LayerId::Foreground)
    }

    #[test]
    fn test_enter_animation_completes() {
        let (mut orchestrator, mut driver, surfaces) = setup();
        driver.start_all(orchestrator.show_layer(LayerId::Foreground, alert()));

        assert!(driver.update(0.5).is_empty());
        assert!((surfaces[0].opacity() - 0.5).abs() < 1e-6);
        assert_eq!(surfaces[0].content_kind().as_deref(), Some("alert"));

        let tokens = driver.update(0.6);
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            orchestrator.complete_transition(tokens[0]),
            CompletionOutcome::Applied(LayerState::Active)
        );
        assert_eq!(surfaces[0].opacity(), 1.0);
        assert!(driver.is_idle());
    }

    #[test]
    fn test_new_intent_replaces_running_animation() {
        let (mut orchestrator, mut driver, surfaces) = setup();
        driver.start_all(orchestrator.show_layer(LayerId::Foreground, alert()));
        driver.update(0.5);

        driver.start_all(orchestrator.hide_layer(LayerId::Foreground));
        assert_eq!(driver.active_count(), 1);
        assert_eq!(
            driver.animation(LayerId::Foreground).map(|a| a.kind),
            Some(IntentKind::StartExit)
        );

        // 退场从当前透明度开始
        driver.update(0.5);
        assert!((surfaces[0].opacity() - 0.25).abs() < 1e-6);

        let tokens = driver.skip_all();
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            orchestrator.complete_transition(tokens[0]),
            CompletionOutcome::Applied(LayerState::Hidden)
        );
        assert_eq!(surfaces[0].status(), LayerState::Hidden);
    }

    #[test]
    fn test_refresh_keeps_running_enter() {
        let (mut orchestrator, mut driver, surfaces) = setup();
        driver.start_all(orchestrator.show_layer(LayerId::Foreground, alert()));
        driver.update(0.5);

        let update = ContentCandidate::new("alert", json!({ "user": "b" }), 2.0, 1)
            .on_layer(LayerId::Foreground);
        driver.start_all(orchestrator.show_layer(LayerId::Foreground, update));
        assert_eq!(
            surfaces[0].content().map(|c| c.data),
            Some(json!({ "user": "b" }))
        );
        assert_eq!(
            driver.animation(LayerId::Foreground).map(|a| a.kind),
            Some(IntentKind::StartEnter)
        );

        // 原来的入场动画照常完成并回调
        let tokens = driver.update(0.6);
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            orchestrator.complete_transition(tokens[0]),
            CompletionOutcome::Applied(LayerState::Active)
        );
        assert_eq!(surfaces[0].opacity(), 1.0);
    }

    #[test]
    fn test_interrupt_animation_finishes_silently() {
        let (mut orchestrator, mut driver, surfaces) = setup();
        let ambient = ContentCandidate::new("follower", json!({}), 0.0, 0);
        driver.start_all(orchestrator.show_layer(LayerId::Background, ambient));
        for token in driver.skip_all() {
            orchestrator.complete_transition(token);
        }
        assert_eq!(surfaces[2].opacity(), 1.0);

        driver.start_all(orchestrator.show_layer(LayerId::Foreground, alert()));
        assert_eq!(driver.active_count(), 2);

        let tokens = driver.update(0.5);
        // 背景的中断动画结束但不回调
        assert!(tokens.is_empty());
        assert_eq!(surfaces[2].opacity(), 0.0);
        assert_eq!(surfaces[2].content_kind().as_deref(), Some("follower"));
        assert_eq!(driver.active_count(), 1);
    }
}
