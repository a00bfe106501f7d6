//! # Stream 模块
//!
//! 应用状态快照流：每行一个完整的 JSON 快照。
//!
//! 每个快照都是权威且完整的，宿主只关心其中的 `candidates`，
//! 其余字段原样保留。空行跳过；无法解析的行带行号报告后跳过，
//! 不会中断整个流。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// 快照流错误
#[derive(Error, Debug)]
pub enum StreamError {
    /// 读取失败
    #[error("读取快照流失败: {0}")]
    Io(#[from] io::Error),

    /// 某一行不是合法的快照
    #[error("第 {line} 行不是合法的状态快照: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl StreamError {
    /// 出错的行号（从 1 开始），IO 错误没有行号
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io(_) => None,
            Self::Json { line, .. } => Some(*line),
        }
    }
}

/// 应用状态快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// 候选内容的原始记录，逐条解析，单条失败不影响其他记录
    #[serde(default)]
    pub candidates: Vec<Value>,

    /// 其余附带字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateSnapshot {
    /// 从候选记录创建
    pub fn from_candidates(candidates: Vec<Value>) -> Self {
        Self {
            candidates,
            extra: Map::new(),
        }
    }

    /// 解析一行快照
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// JSON Lines 快照读取器
pub struct SnapshotReader<R> {
    lines: io::Lines<R>,
    line: usize,
    done: bool,
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            done: false,
        }
    }

    /// 已读取的行数
    pub fn line(&self) -> usize {
        self.line
    }
}

impl SnapshotReader<Box<dyn BufRead>> {
    /// 打开输入：`-` 表示标准输入，其余视为文件路径
    pub fn open(input: impl AsRef<Path>) -> Result<Self, StreamError> {
        let input = input.as_ref();
        let reader: Box<dyn BufRead> = if input == Path::new("-") {
            Box::new(BufReader::new(io::stdin()))
        } else {
            Box::new(BufReader::new(File::open(input)?))
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Iterator for SnapshotReader<R> {
    type Item = Result<StateSnapshot, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line += 1;

            if text.trim().is_empty() {
                continue;
            }

            return Some(StateSnapshot::parse(&text).map_err(|source| StreamError::Json {
                line: self.line,
                source,
            }));
        }
    }
}
