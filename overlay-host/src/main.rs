//! # Overlay Host CLI
//!
//! 无头回放工具：读取状态快照流，驱动三图层协调器，输出最终的图层诊断。
//!
//! ## 用法
//!
//! ```bash
//! overlay-host replay --input states.jsonl
//! cat states.jsonl | overlay-host replay --input - --json
//! overlay-host replay --input states.jsonl --frame-ms 33 --frames-per-snapshot 10
//! overlay-host check-config overlay.json
//! overlay-host init-config overlay.json
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use overlay_host::{HostConfig, OverlayHost, ReplayOptions, SnapshotReader, logging, replay};
use std::path::PathBuf;

/// 默认配置文件
const DEFAULT_CONFIG_PATH: &str = "overlay.json";

#[derive(Parser)]
#[command(name = "overlay-host")]
#[command(about = "覆盖层协调器的无头宿主 - 回放状态快照流并输出图层诊断")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放状态快照流
    Replay {
        /// 快照文件（JSON Lines），`-` 表示标准输入
        #[arg(short, long)]
        input: PathBuf,

        /// 配置文件（默认：overlay.json，不存在时使用默认配置）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 每帧时长（毫秒）
        #[arg(long, default_value = "16")]
        frame_ms: u64,

        /// 每个快照之后推进的帧数
        #[arg(long, default_value = "30")]
        frames_per_snapshot: u32,

        /// 日志级别，覆盖配置文件
        #[arg(long)]
        log_level: Option<String>,

        /// 以 JSON 输出诊断
        #[arg(long)]
        json: bool,

        /// 结束时不跳过仍在运行的动画
        #[arg(long)]
        no_settle: bool,
    },

    /// 检查配置文件
    CheckConfig {
        /// 配置文件路径
        path: PathBuf,
    },

    /// 写出默认配置
    InitConfig {
        /// 输出路径
        path: PathBuf,

        /// 覆盖已有文件
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            input,
            config,
            frame_ms,
            frames_per_snapshot,
            log_level,
            json,
            no_settle,
        } => {
            let config_path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            // 命令行 > 配置文件 > 默认值
            let level = log_level
                .or_else(|| HostConfig::read(&config_path).ok().map(|c| c.log_level))
                .unwrap_or_else(|| HostConfig::default().log_level);
            logging::init(&level);

            let config = HostConfig::load(&config_path);
            config.validate().context("配置无效")?;

            let options = ReplayOptions {
                frame_secs: frame_ms as f32 / 1000.0,
                frames_per_snapshot,
                settle: !no_settle,
            };
            let reader = SnapshotReader::open(&input)
                .with_context(|| format!("无法打开快照流 {}", input.display()))?;
            let mut host = OverlayHost::new(&config);
            replay(&mut host, reader, &options).context("读取快照流失败")?;

            let snapshot = host.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", snapshot);
                println!(
                    "可见图层: {}，待处理指令: {}",
                    snapshot.visible_count(),
                    snapshot.pending_count()
                );
            }
        }
        Commands::CheckConfig { path } => {
            logging::init("warn");
            let config = HostConfig::read(&path)
                .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
            config.validate()?;
            println!("配置有效: {}", path.display());
        }
        Commands::InitConfig { path, force } => {
            logging::init("warn");
            if path.exists() && !force {
                bail!("{} 已存在，使用 --force 覆盖", path.display());
            }
            HostConfig::default()
                .save(&path)
                .with_context(|| format!("无法写入配置文件 {}", path.display()))?;
            println!("已写出默认配置: {}", path.display());
        }
    }

    Ok(())
}
