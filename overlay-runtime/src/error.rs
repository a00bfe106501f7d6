//! # Error 模块
//!
//! 定义 overlay-runtime 中使用的错误类型。
//!
//! 协调器的公开操作本身不会失败（未注册的图层走 PendingCommand，
//! 过期的完成回调直接忽略），这里的错误只出现在边界：
//! 解析图层标识、解析候选内容记录。

use thiserror::Error;

/// 图层标识错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// 未知的图层名称
    #[error("未知图层 '{name}'，有效值为 foreground / midground / background")]
    UnknownLayer { name: String },

    /// 图层索引越界
    #[error("图层索引 {index} 越界，有效范围是 0..3")]
    IndexOutOfRange { index: usize },
}

/// 候选内容记录错误
///
/// 单条记录解析失败只会让这一条被丢弃，不会中断整个选择流程。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandidateError {
    /// 记录结构不合法（缺少必需字段、类型错误、未知图层等）
    #[error("第 {index} 条候选记录无效: {message}")]
    Malformed { index: usize, message: String },

    /// 优先级不是有限数值
    #[error("第 {index} 条候选记录的优先级无效: {priority}")]
    InvalidPriority { index: usize, priority: f64 },
}

impl CandidateError {
    /// 出错记录在输入中的位置
    pub fn index(&self) -> usize {
        match self {
            Self::Malformed { index, .. } | Self::InvalidPriority { index, .. } => *index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_error_message() {
        let err = LayerError::IndexOutOfRange { index: 7 };
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_candidate_error_index() {
        let err = CandidateError::Malformed {
            index: 3,
            message: "missing field `type`".to_string(),
        };
        assert_eq!(err.index(), 3);
        assert_eq!(
            CandidateError::InvalidPriority {
                index: 1,
                priority: f64::NAN
            }
            .index(),
            1
        );
    }
}
