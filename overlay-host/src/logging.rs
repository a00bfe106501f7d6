//! # Logging 模块
//!
//! 初始化 tracing 输出。只有宿主打日志，overlay-runtime 保持纯逻辑。

use tracing::Level;

/// 解析日志级别，无法识别时回退到 info
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// 初始化全局日志
///
/// 重复初始化（例如测试中）静默忽略。日志写到 stderr，stdout 留给输出结果。
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
