//! # Timeline 模块
//!
//! 单个图层的透明度动画。
//!
//! 动画只关注 f32 值的时间轴变化：从 `from` 到 `to`，在 `duration` 内完成。

use overlay_runtime::{IntentKind, TransitionToken};

use super::EasingFunction;

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 正在播放
    #[default]
    Playing,
    /// 已完成
    Completed,
    /// 已跳过
    Skipped,
}

impl AnimationState {
    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// 图层透明度动画
#[derive(Debug, Clone)]
pub struct LayerAnimation {
    /// 对应的动画意图
    pub kind: IntentKind,
    /// 过渡令牌，完成后交回协调器
    pub token: TransitionToken,
    /// 起始透明度
    pub from: f32,
    /// 目标透明度
    pub to: f32,
    /// 动画时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: AnimationState,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    pub progress: f32,
    /// 已经过的时间
    elapsed: f32,
}

impl LayerAnimation {
    /// 创建新的动画
    ///
    /// 时长不大于 0 或不是有限数值的动画创建即完成。
    pub fn new(kind: IntentKind, token: TransitionToken, from: f32, duration: f32) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let (state, progress) = if duration == 0.0 {
            (AnimationState::Completed, 1.0)
        } else {
            (AnimationState::Playing, 0.0)
        };

        Self {
            kind,
            token,
            from,
            to: target_opacity(kind).unwrap_or(from),
            duration,
            easing: EasingFunction::default(),
            state,
            progress,
            elapsed: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 更新动画
    ///
    /// # 返回
    /// - `true`: 动画仍在进行中
    /// - `false`: 动画已结束
    pub fn update(&mut self, dt: f32) -> bool {
        if self.state.is_finished() {
            return false;
        }

        self.elapsed += dt;
        let raw_progress = self.elapsed / self.duration;
        if raw_progress >= 1.0 {
            self.progress = 1.0;
            self.state = AnimationState::Completed;
            false
        } else {
            self.progress = self.easing.apply(raw_progress);
            true
        }
    }

    /// 跳过动画
    pub fn skip(&mut self) {
        if !self.state.is_finished() {
            self.progress = 1.0;
            self.state = AnimationState::Skipped;
        }
    }

    /// 获取当前值
    pub fn current_value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

/// 动画意图对应的目标透明度
///
/// 被中断的图层淡出到不可见，内容保留在表面上等待恢复。
/// 内容刷新不改变透明度，返回 `None`。
pub fn target_opacity(kind: IntentKind) -> Option<f32> {
    match kind {
        IntentKind::StartEnter | IntentKind::StartResume => Some(1.0),
        IntentKind::StartExit | IntentKind::StartInterrupt => Some(0.0),
        IntentKind::RefreshContent => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_runtime::{LayerId, LayerOrchestrator, LayerState, RenderTarget};

    #[derive(Debug, Clone)]
    struct NullTarget;

    impl RenderTarget for NullTarget {
        fn set_status(&self, _status: LayerState) {}
    }

    fn token() -> TransitionToken {
        let mut orchestrator: LayerOrchestrator<NullTarget, ()> = LayerOrchestrator::new();
        orchestrator.register_layer(LayerId::Foreground, NullTarget);
        orchestrator.show_layer(LayerId::Foreground, ())[0].token
    }

    #[test]
    fn test_animation_update() {
        let mut anim = LayerAnimation::new(IntentKind::StartEnter, token(), 0.0, 1.0)
            .with_easing(EasingFunction::Linear);
        assert_eq!(anim.state, AnimationState::Playing);

        assert!(anim.update(0.5));
        assert!((anim.current_value() - 0.5).abs() < 1e-6);

        assert!(!anim.update(0.6));
        assert_eq!(anim.state, AnimationState::Completed);
        assert_eq!(anim.current_value(), 1.0);
        assert!(!anim.update(0.1));
    }

    #[test]
    fn test_exit_fades_from_current() {
        let mut anim = LayerAnimation::new(IntentKind::StartExit, token(), 0.8, 0.4);
        assert_eq!(anim.current_value(), 0.8);
        anim.skip();
        assert_eq!(anim.state, AnimationState::Skipped);
        assert_eq!(anim.current_value(), 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let anim = LayerAnimation::new(IntentKind::StartResume, token(), 0.0, 0.0);
        assert!(anim.is_finished());
        assert_eq!(anim.current_value(), 1.0);
    }

    #[test]
    fn test_non_finite_duration_finishes_immediately() {
        for duration in [f32::NAN, f32::INFINITY, -1.0] {
            let mut anim = LayerAnimation::new(IntentKind::StartEnter, token(), 0.0, duration);
            assert!(anim.is_finished());
            assert_eq!(anim.duration, 0.0);
            assert!(!anim.update(0.016));
            assert_eq!(anim.current_value(), 1.0);
        }
    }

    #[test]
    fn test_refresh_keeps_opacity() {
        assert_eq!(target_opacity(IntentKind::RefreshContent), None);
        let anim = LayerAnimation::new(IntentKind::RefreshContent, token(), 0.6, 0.0);
        assert_eq!(anim.current_value(), 0.6);
    }
}
