//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 reveal-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `trace-check`: 检查输入轨迹与配置文件

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reveal_host::{AppConfig, InputTrace};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 reveal-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 检查输入轨迹（默认 traces/）和配置文件
    TraceCheck {
        /// 轨迹文件或目录
        path: Option<PathBuf>,

        /// 配置文件
        #[arg(long, default_value = "config.json")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Task::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            step("cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Task::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p reveal-runtime --html");
            cmd!(sh, "cargo llvm-cov -p reveal-runtime --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除 xtask，避免稀释信号
            step("cargo llvm-cov --workspace --exclude xtask --html");
            cmd!(sh, "cargo llvm-cov --workspace --exclude xtask --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::TraceCheck { path, config } => {
            trace_check(path.as_deref(), &config)?;
        }
    }

    Ok(())
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
        anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        );
    }
    Ok(())
}

//=============================================================================
// trace-check 命令实现
//=============================================================================

/// 默认轨迹目录（相对于 workspace root）
const TRACES_DIR: &str = "traces";

/// 执行轨迹检查
fn trace_check(path: Option<&Path>, config: &Path) -> anyhow::Result<()> {
    let mut errors = 0;

    if config.exists() {
        match AppConfig::load_strict(config).and_then(|c| c.validate().map(|_| c)) {
            Ok(_) => eprintln!("[OK] {}", config.display()),
            Err(e) => {
                eprintln!("[ERROR] {}: {}", config.display(), e);
                errors += 1;
            }
        }
    } else {
        eprintln!("[WARN] 配置文件不存在: {}，跳过", config.display());
    }

    let root = path.unwrap_or_else(|| Path::new(TRACES_DIR));
    if !root.exists() {
        anyhow::bail!(
            "轨迹路径不存在: {}\n请在 workspace 根目录运行，或指定轨迹路径",
            root.display()
        );
    }
    let files = collect_trace_files(root)?;
    if files.is_empty() {
        eprintln!("未找到轨迹文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个轨迹文件...\n", files.len());
    for file in &files {
        match InputTrace::load(file) {
            Ok(trace) => eprintln!(
                "[OK] {}: {} 个事件，最后一个在 {}ms",
                file.display(),
                trace.events.len(),
                trace.last_event_ms()
            ),
            Err(e) => {
                eprintln!("[ERROR] {}: {}", file.display(), e);
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        eprintln!("❌ {} 个错误", errors);
        anyhow::bail!("轨迹检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集所有 .json 轨迹文件
fn collect_trace_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
