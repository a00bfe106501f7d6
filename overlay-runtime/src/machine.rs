//! # Machine 模块
//!
//! 图层状态机核心：纯转换函数，不做任何 IO。
//!
//! ```text
//! apply(state, event, context) -> Step { next, intent }
//! ```
//!
//! 状态机只回答"下一个状态是什么、需要哪种动画"，
//! 内容载荷、渲染目标、级联都由 Orchestrator 负责。

use crate::command::IntentKind;
use crate::layer::LayerState;

/// 状态机事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerEvent {
    /// 显示（或刷新）内容
    Show,
    /// 隐藏
    Hide,
    /// 入场动画完成
    EnterComplete,
    /// 退场动画完成
    ExitComplete,
    /// 级联：被更高优先级图层中断
    Interrupt,
    /// 级联：从中断中恢复
    Resume,
}

/// 转换上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    /// 图层是否已挂载渲染目标
    pub attached: bool,
    /// 是否有严格更高的图层处于 Entering / Active
    pub blocked: bool,
}

/// 一次转换的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// 下一个状态
    pub next: LayerState,
    /// 需要的动画意图（没有则为 None）
    pub intent: Option<IntentKind>,
}

impl Step {
    fn stay(state: LayerState) -> Self {
        Self {
            next: state,
            intent: None,
        }
    }

    fn to(next: LayerState, intent: IntentKind) -> Self {
        Self {
            next,
            intent: Some(intent),
        }
    }

    fn silent(next: LayerState) -> Self {
        Self { next, intent: None }
    }
}

/// 状态转换函数
///
/// 未挂载渲染目标的图层永远停在当前状态（即 Hidden），不产生意图；
/// 调用方负责把指令记入 PendingCommand。
pub fn apply(state: LayerState, event: LayerEvent, context: Context) -> Step {
    use LayerEvent as E;
    use LayerState as S;

    if !context.attached {
        return Step::stay(state);
    }

    match (state, event) {
        // 进入：被压制时直接排在中断态，等待级联恢复
        (S::Hidden | S::Exiting, E::Show) if context.blocked => {
            Step::to(S::Interrupted, IntentKind::StartInterrupt)
        }
        (S::Hidden | S::Exiting, E::Show) => Step::to(S::Entering, IntentKind::StartEnter),

        // 已占用时的 Show 只替换载荷
        (S::Entering, E::Show) | (S::Active, E::Show) => Step::stay(state),
        (S::Interrupted, E::Show) if context.blocked => Step::stay(state),
        (S::Interrupted, E::Show) => Step::to(S::Active, IntentKind::StartResume),

        (S::Entering | S::Active | S::Interrupted, E::Hide) => {
            Step::to(S::Exiting, IntentKind::StartExit)
        }

        (S::Entering, E::EnterComplete) => Step::silent(S::Active),
        (S::Exiting, E::ExitComplete) => Step::silent(S::Hidden),

        (S::Entering | S::Active, E::Interrupt) => {
            Step::to(S::Interrupted, IntentKind::StartInterrupt)
        }
        (S::Interrupted, E::Resume) => Step::to(S::Active, IntentKind::StartResume),

        // Hide on Hidden / Exiting、不匹配当前状态的完成回调等
        _ => Step::stay(state),
    }
}

/// 这次转换是否让图层开始压制更低的图层
pub fn starts_covering(from: LayerState, to: LayerState) -> bool {
    !from.is_covering() && to.is_covering()
}

/// 这次转换是否让图层停止压制更低的图层
pub fn stops_covering(from: LayerState, to: LayerState) -> bool {
    from.is_covering() && !to.is_covering()
}

#[cfg(test)]
mod tests {
    use super::*;
    use LayerEvent as E;
    use LayerState as S;

    fn attached() -> Context {
        Context {
            attached: true,
            blocked: false,
        }
    }

    fn blocked() -> Context {
        Context {
            attached: true,
            blocked: true,
        }
    }

    #[test]
    fn test_show_from_hidden() {
        let step = apply(S::Hidden, E::Show, attached());
        assert_eq!(step.next, S::Entering);
        assert_eq!(step.intent, Some(IntentKind::StartEnter));
    }

    #[test]
    fn test_unattached_layer_stays_hidden() {
        let step = apply(S::Hidden, E::Show, Context::default());
        assert_eq!(step.next, S::Hidden);
        assert_eq!(step.intent, None);
    }

    #[test]
    fn test_repeated_show_while_entering() {
        let step = apply(S::Entering, E::Show, attached());
        assert_eq!(step.next, S::Entering);
        assert_eq!(step.intent, None);
    }

    #[test]
    fn test_enter_complete_and_hide() {
        assert_eq!(apply(S::Entering, E::EnterComplete, attached()).next, S::Active);

        let step = apply(S::Active, E::Hide, attached());
        assert_eq!(step.next, S::Exiting);
        assert_eq!(step.intent, Some(IntentKind::StartExit));

        // 入场中途也可以隐藏
        assert_eq!(apply(S::Entering, E::Hide, attached()).next, S::Exiting);
        assert_eq!(apply(S::Exiting, E::ExitComplete, attached()).next, S::Hidden);
    }

    #[test]
    fn test_hide_is_noop_when_not_occupying() {
        assert_eq!(apply(S::Hidden, E::Hide, attached()), Step::stay(S::Hidden));
        assert_eq!(apply(S::Exiting, E::Hide, attached()), Step::stay(S::Exiting));
    }

    #[test]
    fn test_interrupt_and_resume() {
        let step = apply(S::Active, E::Interrupt, attached());
        assert_eq!(step.next, S::Interrupted);
        assert_eq!(step.intent, Some(IntentKind::StartInterrupt));
        assert_eq!(apply(S::Entering, E::Interrupt, attached()).next, S::Interrupted);

        let step = apply(S::Interrupted, E::Resume, attached());
        assert_eq!(step.next, S::Active);
        assert_eq!(step.intent, Some(IntentKind::StartResume));

        // Hidden 不会被中断
        assert_eq!(apply(S::Hidden, E::Interrupt, attached()).next, S::Hidden);
    }

    #[test]
    fn test_show_while_interrupted() {
        let step = apply(S::Interrupted, E::Show, attached());
        assert_eq!(step.next, S::Active);
        assert_eq!(step.intent, Some(IntentKind::StartResume));

        // 上层仍在显示时只刷新内容
        assert_eq!(apply(S::Interrupted, E::Show, blocked()), Step::stay(S::Interrupted));
    }

    #[test]
    fn test_show_while_blocked_queues_as_interrupted() {
        let step = apply(S::Hidden, E::Show, blocked());
        assert_eq!(step.next, S::Interrupted);
        assert_eq!(step.intent, Some(IntentKind::StartInterrupt));
    }

    #[test]
    fn test_show_while_exiting_reenters() {
        let step = apply(S::Exiting, E::Show, attached());
        assert_eq!(step.next, S::Entering);
        assert_eq!(step.intent, Some(IntentKind::StartEnter));
    }

    #[test]
    fn test_stale_completion_events() {
        // 已在退场：迟到的入场完成不能回退到 Active
        assert_eq!(apply(S::Exiting, E::EnterComplete, attached()).next, S::Exiting);
        assert_eq!(apply(S::Interrupted, E::EnterComplete, attached()).next, S::Interrupted);
        assert_eq!(apply(S::Entering, E::ExitComplete, attached()).next, S::Entering);
    }

    #[test]
    fn test_covering_transitions() {
        assert!(starts_covering(S::Hidden, S::Entering));
        assert!(starts_covering(S::Interrupted, S::Active));
        assert!(!starts_covering(S::Entering, S::Active));
        assert!(stops_covering(S::Active, S::Exiting));
        assert!(stops_covering(S::Entering, S::Interrupted));
        assert!(!stops_covering(S::Interrupted, S::Exiting));
    }
}
