//! About 页面名字揭示 - 无界面回放
//!
//! 读取配置和输入轨迹，在模拟文档上回放，逐帧输出布局。
//!
//! ```bash
//! cargo run -p reveal-host -- --trace traces/scroll_reveal.json
//! cargo run -p reveal-host -- --trace traces/click_reveal.json --seed 7 --json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};

use reveal_host::{AboutSession, AppConfig, InputTrace, ReplayReport, SimulatedDocument, describe};

#[derive(Parser)]
#[command(name = "reveal-host")]
#[command(about = "About 页面名字揭示 - 无界面回放")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 输入轨迹文件
    #[arg(short, long)]
    trace: PathBuf,

    /// 乱码随机种子（覆盖配置）
    #[arg(long)]
    seed: Option<u64>,

    /// 以 JSON 输出回放结果
    #[arg(long)]
    json: bool,

    /// 输出计时器触发的每一帧
    #[arg(long)]
    frames: bool,

    /// 日志详细程度（-v debug，-vv trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(&cli.config);
    if cli.seed.is_some() {
        config.debug.seed = cli.seed;
    }
    if cli.frames {
        config.debug.log_frames = true;
    }
    config.validate().context("配置无效")?;

    let trace = InputTrace::load(&cli.trace)
        .with_context(|| format!("无法加载输入轨迹 {}", cli.trace.display()))?;
    info!(path = %cli.trace.display(), events = trace.events.len(), "输入轨迹已加载");

    let document =
        SimulatedDocument::from_config(&config.document, &config.runtime.lock.target_section);
    let mut session = AboutSession::new(config, document)?;
    let report = session.replay(&trace).await?;
    session.dispose();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for record in &report.frames {
        println!(
            "{:>6}ms {:<12} {}",
            record.at_ms,
            record.source,
            describe(&record.snapshot, &record.frame)
        );
    }
    println!(
        "完成次数: {}，用时 {}ms，最终阶段 {:?}",
        report.completions, report.elapsed_ms, report.final_snapshot.phase
    );
}
