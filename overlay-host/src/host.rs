//! # Host 模块
//!
//! 无头宿主：把状态快照流、内容选择、图层协调和动画驱动串成一条链。
//!
//! ```text
//! StateSnapshot ──ingest──► ContentSelector ──► LayerOrchestrator ──► AnimationDriver
//!                                                      ▲                    │
//!                                                      └──── update(dt) ────┘
//! ```

use overlay_runtime::{
    CompletionOutcome, ContentSelector, LayerChange, LayerId, LayerOrchestrator, LayerState,
    OrchestratorSnapshot, SelectedContent, TransitionToken,
};
use tracing::{debug, info, warn};

use crate::animation::AnimationDriver;
use crate::config::HostConfig;
use crate::stream::StateSnapshot;
use crate::surface::OverlaySurface;

/// 单次 ingest 的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// 有效候选数
    pub accepted: usize,
    /// 被丢弃的候选数
    pub rejected: usize,
    /// 产生的动画意图数
    pub intents: usize,
}

/// 无头宿主
pub struct OverlayHost {
    orchestrator: LayerOrchestrator<OverlaySurface>,
    selector: ContentSelector,
    driver: AnimationDriver,
    surfaces: Vec<OverlaySurface>,
    selection: SelectedContent,
}

impl OverlayHost {
    /// 按配置创建宿主，并为配置中的图层注册表面
    pub fn new(config: &HostConfig) -> Self {
        let mut host = Self {
            orchestrator: LayerOrchestrator::new(),
            selector: ContentSelector::new(config.selector.clone()),
            driver: AnimationDriver::new(config.animation.clone()),
            surfaces: Vec::new(),
            selection: SelectedContent::default(),
        };

        host.orchestrator.subscribe(|change: &LayerChange| {
            debug!(
                layer = %change.layer,
                from = %change.from,
                to = %change.to,
                cause = ?change.cause,
                "图层状态变化"
            );
        });

        for layer in &config.layers {
            host.attach(*layer);
        }
        host
    }

    /// 为图层创建并注册一个新表面
    ///
    /// 已有表面会被替换。注册前积压的指令在此时重放。
    pub fn attach(&mut self, layer: LayerId) -> OverlaySurface {
        let surface = OverlaySurface::new(layer);
        self.surfaces.retain(|s| s.layer() != layer);
        self.surfaces.push(surface.clone());

        let intents = self.orchestrator.register_layer(layer, surface.clone());
        info!(layer = %layer, replayed = intents.len(), "注册图层表面");
        self.driver.start_all(intents);
        surface
    }

    /// 注销图层表面
    pub fn detach(&mut self, layer: LayerId) {
        self.surfaces.retain(|s| s.layer() != layer);
        let intents = self.orchestrator.unregister_layer(layer);
        info!(layer = %layer, restored = intents.len(), "注销图层表面");
        self.driver.start_all(intents);
    }

    /// 处理一个状态快照：解析 → 选择 → 落实到图层
    pub fn ingest(&mut self, snapshot: &StateSnapshot) -> IngestReport {
        let (selection, rejected) = self.selector.select_records(&snapshot.candidates);
        for error in &rejected {
            warn!(index = error.index(), error = %error, "丢弃无效候选记录");
        }

        let intents = self.orchestrator.apply_selection(&selection);
        let report = IngestReport {
            accepted: snapshot.candidates.len() - rejected.len(),
            rejected: rejected.len(),
            intents: intents.len(),
        };
        debug!(
            accepted = report.accepted,
            rejected = report.rejected,
            intents = report.intents,
            "处理状态快照"
        );

        self.driver.start_all(intents);
        self.selection = selection;
        report
    }

    /// 推进动画，并把完成回调交回协调器
    pub fn update(&mut self, dt: f32) {
        for token in self.driver.update(dt) {
            self.complete(token);
        }
    }

    /// 跳过所有正在运行的动画
    pub fn skip_animations(&mut self) {
        for token in self.driver.skip_all() {
            self.complete(token);
        }
    }

    fn complete(&mut self, token: TransitionToken) {
        match self.orchestrator.complete_transition(token) {
            CompletionOutcome::Applied(state) => {
                debug!(token = %token, state = %state, "过渡完成");
            }
            CompletionOutcome::Stale => {
                debug!(token = %token, "忽略过期的完成回调");
            }
            CompletionOutcome::Ignored => {}
        }
    }

    /// 最近一次选择结果
    pub fn selection(&self) -> &SelectedContent {
        &self.selection
    }

    /// 诊断快照
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.orchestrator.snapshot()
    }

    pub fn layer_state(&self, layer: LayerId) -> LayerState {
        self.orchestrator.layer_state(layer)
    }

    /// 图层当前的表面
    pub fn surface(&self, layer: LayerId) -> Option<&OverlaySurface> {
        self.surfaces.iter().find(|s| s.layer() == layer)
    }

    pub fn orchestrator(&self) -> &LayerOrchestrator<OverlaySurface> {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut LayerOrchestrator<OverlaySurface> {
        &mut self.orchestrator
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// 是否所有动画都已结束
    pub fn is_settled(&self) -> bool {
        self.driver.is_idle()
    }
}
