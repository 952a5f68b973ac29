//! # configlang-cli
//!
//! `configlang` 的命令行入口：从文件或 stdin 读取程序，
//! 编译后把 XML/JSON 写到 stdout；错误以一行文字写到 stderr，退出码为 1。
//!
//! ## 模块结构
//!
//! - [`app`]：参数定义与执行流程
//! - [`config`]：配置文件
//! - [`logging`]：日志初始化

pub mod app;
pub mod config;
pub mod logging;

pub use app::{Cli, EXAMPLE_PROGRAM, Settings, compile_text, generate_examples, run};
pub use config::{CliConfig, ConfigError, ConfigFallback};
