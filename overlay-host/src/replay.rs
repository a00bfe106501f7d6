//! # Replay 模块
//!
//! 把一整条快照流回放到宿主上：每个快照之后推进固定帧数，
//! 结束时可选地跳过仍在运行的动画。

use std::io::BufRead;
use tracing::{info, warn};

use crate::host::OverlayHost;
use crate::stream::{SnapshotReader, StreamError};

/// 回放参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// 每帧时长（秒）
    pub frame_secs: f32,
    /// 每个快照之后推进的帧数
    pub frames_per_snapshot: u32,
    /// 结束时跳过仍在运行的动画
    pub settle: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            frame_secs: 0.016,
            frames_per_snapshot: 30,
            settle: true,
        }
    }
}

/// 回放统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// 处理的快照数
    pub ingested: usize,
    /// 被跳过的行号
    pub skipped_lines: Vec<usize>,
}

/// 回放快照流
///
/// 无法解析的行记录警告后跳过，读取失败则终止并返回错误。
pub fn replay<R: BufRead>(
    host: &mut OverlayHost,
    reader: SnapshotReader<R>,
    options: &ReplayOptions,
) -> Result<ReplaySummary, StreamError> {
    let mut summary = ReplaySummary::default();

    for result in reader {
        match result {
            Ok(snapshot) => {
                host.ingest(&snapshot);
                summary.ingested += 1;
                for _ in 0..options.frames_per_snapshot {
                    host.update(options.frame_secs);
                }
            }
            Err(StreamError::Json { line, source }) => {
                warn!(line = line, error = %source, "跳过无效快照");
                summary.skipped_lines.push(line);
            }
            Err(e) => return Err(e),
        }
    }

    if options.settle {
        host.skip_animations();
    }

    let snapshot = host.snapshot();
    info!(
        ingested = summary.ingested,
        skipped = summary.skipped_lines.len(),
        visible = snapshot.visible_count(),
        pending = snapshot.pending_count(),
        "回放结束"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostConfig;
    use overlay_runtime::{LayerId, LayerState};
    use std::io::Cursor;

    #[test]
    fn test_replay_counts_snapshots() {
        let input = concat!(
            r#"{"candidates": [{"type": "cheer", "priority": 0.0, "timestamp": 1}]}"#,
            "\n\n",
            r#"{"candidates": []}"#,
            "\n",
        );
        let mut host = OverlayHost::new(&HostConfig::default());
        let summary = replay(
            &mut host,
            SnapshotReader::new(Cursor::new(input)),
            &ReplayOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.ingested, 2);
        assert!(summary.skipped_lines.is_empty());
        assert_eq!(host.layer_state(LayerId::Background), LayerState::Hidden);
        assert!(host.is_settled());
    }

    #[test]
    fn test_replay_without_settle_leaves_animation_running() {
        let input = r#"{"candidates": [{"type": "alert", "priority": 1.0, "layer": "foreground"}]}"#;
        let options = ReplayOptions {
            frames_per_snapshot: 0,
            settle: false,
            ..ReplayOptions::default()
        };
        let mut host = OverlayHost::new(&HostConfig::default());
        replay(&mut host, SnapshotReader::new(Cursor::new(input)), &options).unwrap();

        assert_eq!(host.layer_state(LayerId::Foreground), LayerState::Entering);
        assert!(!host.is_settled());
    }

    #[test]
    fn test_replay_stops_on_read_error() {
        let mut input = br#"{"candidates": []}"#.to_vec();
        input.extend_from_slice(b"\n\xff\xfe\n");
        input.extend_from_slice(br#"{"candidates": [{"type": "raid", "priority": 0.0}]}"#);

        let mut host = OverlayHost::new(&HostConfig::default());
        let err = replay(
            &mut host,
            SnapshotReader::new(Cursor::new(input)),
            &ReplayOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, StreamError::Io(_)));
        // 出错之后的快照不会被处理
        assert_eq!(host.layer_state(LayerId::Background), LayerState::Hidden);
    }
}
