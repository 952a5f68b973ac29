//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 configlang 覆盖率
//! - `config-check`: 批量检查配置程序（语法、求值、渲染）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use configlang::{ConfigLangError, Format, compile};
use walkdir::WalkDir;

/// 配置程序文件扩展名
const PROGRAM_EXTENSION: &str = "cfl";

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-core" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "configlang", "--html"]);
            run("cargo llvm-cov -p configlang --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next();
            config_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 configlang 覆盖率报告
  config-check    检查配置程序文件

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查 configs/ 下所有 .cfl 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - 语法错误
    - 求值错误（未定义/重复定义的常量、重复键）
    - 能否渲染为 JSON 与 XML

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo config-check  -> cargo xtask config-check
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 默认检查目录（相对于 workspace root）
const DEFAULT_CONFIGS_DIR: &str = "configs";

/// 单个文件的检查结果
enum FileOutcome {
    Ok,
    Syntax(String),
    Eval(String),
    Unreadable(String),
}

/// 执行配置程序检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_program_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_CONFIGS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认目录不存在: {}\n请在 workspace 根目录运行，或指定路径",
                    dir.display()
                );
            }
            collect_program_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到配置程序文件（.{PROGRAM_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个文件...\n", files.len());

    let mut syntax_errors = 0;
    let mut eval_errors = 0;
    let mut unreadable = 0;
    for file in &files {
        let label = file.display();
        match check_file(file) {
            FileOutcome::Ok => {}
            FileOutcome::Syntax(msg) => {
                eprintln!("[ERROR] {label}: {msg}");
                syntax_errors += 1;
            }
            FileOutcome::Eval(msg) => {
                eprintln!("[ERROR] {label}: {msg}");
                eval_errors += 1;
            }
            FileOutcome::Unreadable(msg) => {
                eprintln!("[ERROR] {label}: 无法读取文件 - {msg}");
                unreadable += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个文件", files.len());
    if syntax_errors + eval_errors + unreadable > 0 {
        eprintln!(
            "❌ {syntax_errors} 个语法错误, {eval_errors} 个求值错误, {unreadable} 个文件无法读取"
        );
        anyhow::bail!("配置检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 递归收集目录下的配置程序文件（排序后返回）
fn collect_program_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == PROGRAM_EXTENSION))
        .collect();
    files.sort();
    files
}

/// 编译单个文件到两种格式
fn check_file(file: &Path) -> FileOutcome {
    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => return FileOutcome::Unreadable(e.to_string()),
    };

    for format in [Format::Xml, Format::Json] {
        match compile(&content, format) {
            Ok(_) => {}
            Err(e @ ConfigLangError::Syntax(_)) => return FileOutcome::Syntax(e.to_string()),
            Err(e @ ConfigLangError::Eval(_)) => return FileOutcome::Eval(e.to_string()),
        }
    }
    FileOutcome::Ok
}
