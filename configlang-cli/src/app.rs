//! # App 模块
//!
//! 命令行参数定义与执行流程。核心库只负责 parse / eval / render，
//! 读文件、写文件和错误输出都在这里完成。

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use configlang::{ConfigLangError, Format, eval_program, parse_program, render};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use crate::config::{CliConfig, ConfigFallback, DEFAULT_CONFIG_FILE};

/// `--generate-examples` 使用的示例程序
pub const EXAMPLE_PROGRAM: &str =
    "(define defaultport 8e+1) {service={workers=4e+0,port=.[defaultport].,},}";

#[derive(Parser, Debug)]
#[command(name = "configlang")]
#[command(about = "编译 configlang 配置程序为 XML 或 JSON")]
#[command(version)]
pub struct Cli {
    /// 程序文件（缺省时从 stdin 读取）
    pub input: Option<PathBuf>,

    /// 输出格式：json 或 xml（默认：xml）
    #[arg(short, long)]
    pub format: Option<Format>,

    /// 把示例程序的输出写入 output-dir
    #[arg(long)]
    pub generate_examples: bool,

    /// 示例输出目录（默认：当前目录）
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// 以 JSON 打印 AST，不求值
    #[arg(long, conflicts_with = "generate_examples")]
    pub dump_ast: bool,

    /// 配置文件路径（默认：configlang.json）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 日志级别：off/error/warn/info/debug/trace
    #[arg(long)]
    pub log_level: Option<String>,

    /// 把合并后的设置写入配置文件后退出
    #[arg(long, conflicts_with_all = ["generate_examples", "dump_ast"])]
    pub write_config: bool,
}

/// 合并后的运行设置
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub format: Format,
    pub output_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Settings {
    /// 用命令行参数覆盖配置文件
    ///
    /// 返回设置以及需要在日志初始化之后输出的警告。
    pub fn resolve(cli: &Cli, mut config: CliConfig) -> (Self, Vec<String>) {
        if let Some(format) = cli.format {
            config.format = format;
        }
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }

        let mut warnings = Vec::new();
        if let Err(e) = config.validate() {
            warnings.push(format!("{e}; invalid fields reset to defaults"));
            let defaults = CliConfig::default();
            if config.level_filter().is_err() {
                config.log_level = defaults.log_level;
            }
            if config.output_dir.as_os_str().is_empty() {
                config.output_dir = defaults.output_dir;
            }
        }

        let log_level = config.level_filter().unwrap_or(LevelFilter::WARN);
        let settings = Self {
            format: config.format,
            output_dir: config.output_dir,
            log_level,
        };
        (settings, warnings)
    }

    /// 转回可保存的配置文件内容
    pub fn to_config(&self) -> CliConfig {
        CliConfig {
            format: self.format,
            output_dir: self.output_dir.clone(),
            log_level: self.log_level.to_string().to_lowercase(),
        }
    }
}

/// `--config` 指定的配置文件路径，缺省为当前目录下的 configlang.json
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// 加载配置文件
pub fn load_config(cli: &Cli) -> (CliConfig, Option<ConfigFallback>) {
    CliConfig::load(config_path(cli))
}

/// 执行一次命令
pub fn run(
    cli: &Cli,
    settings: &Settings,
    stdin: &mut impl Read,
    stdout: &mut impl Write,
) -> anyhow::Result<()> {
    if cli.write_config {
        let path = config_path(cli);
        settings
            .to_config()
            .save(&path)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        info!(path = %path.display(), "config written");
        return Ok(());
    }

    if cli.generate_examples {
        let path = generate_examples(&settings.output_dir, settings.format)?;
        info!(path = %path.display(), "example written");
        return Ok(());
    }

    let text = read_input(cli.input.as_deref(), stdin)?;

    if cli.dump_ast {
        let program = parse_program(&text).map_err(ConfigLangError::from)?;
        writeln!(stdout, "{}", serde_json::to_string_pretty(&program)?)?;
        return Ok(());
    }

    let output = compile_text(&text, settings.format)?;
    stdout.write_all(output.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// 编译程序文本，逐阶段记录调试日志
pub fn compile_text(text: &str, format: Format) -> Result<String, ConfigLangError> {
    let program = parse_program(text)?;
    debug!(expressions = program.len(), "parsed program");

    let value = eval_program(&program)?;
    debug!(mapping = value.as_mapping().is_some(), "evaluated program");

    let output = render(&value, format)?;
    debug!(%format, bytes = output.len(), "rendered output");
    Ok(output)
}

/// 把示例程序的输出写入 `dir/example.<ext>`
///
/// 目录不存在时创建；另一种格式的旧示例文件会被删除。
pub fn generate_examples(dir: &Path, format: Format) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let output = compile_text(EXAMPLE_PROGRAM, format)?;
    let path = example_path(dir, format);
    fs::write(&path, output + "\n")
        .with_context(|| format!("failed to write {}", path.display()))?;

    for other in [Format::Json, Format::Xml] {
        if other == format {
            continue;
        }
        let stale = example_path(dir, other);
        if stale.exists() {
            fs::remove_file(&stale)
                .with_context(|| format!("failed to remove stale {}", stale.display()))?;
            debug!(path = %stale.display(), "removed stale example");
        }
    }

    Ok(path)
}

fn example_path(dir: &Path, format: Format) -> PathBuf {
    dir.join(format!("example.{}", format.extension()))
}

fn read_input(path: Option<&Path>, stdin: &mut impl Read) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading program file");
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            Ok(text)
        }
    }
}
