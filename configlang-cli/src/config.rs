//! # Config 模块
//!
//! 命令行工具的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (configlang.json)
//! 3. 默认值（最低）

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use configlang::Format;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// 默认配置文件名（相对于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "configlang.json";

/// 工具配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 输出格式（json/xml）
    #[serde(default)]
    pub format: Format,

    /// `--generate-examples` 的输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 日志级别（off/error/warn/info/debug/trace）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// 加载配置文件
    ///
    /// 文件不存在、读取失败或解析失败时返回默认配置。
    /// 日志级别本身来自配置，此时日志系统尚未初始化，
    /// 所以回退原因随返回值交给调用方记录。
    pub fn load(path: impl AsRef<Path>) -> (Self, Option<ConfigFallback>) {
        let path = path.as_ref();

        if !path.exists() {
            return (
                Self::default(),
                Some(ConfigFallback::Missing(path.to_path_buf())),
            );
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => (config, None),
                Err(e) => {
                    let reason = format!("failed to parse config file {}: {e}", path.display());
                    (Self::default(), Some(ConfigFallback::Invalid(reason)))
                }
            },
            Err(e) => {
                let reason = format!("failed to read config file {}: {e}", path.display());
                (Self::default(), Some(ConfigFallback::Invalid(reason)))
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// 解析后的日志级别
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level.parse::<LevelFilter>().map_err(|_| {
            ConfigError::ValidationFailed(format!("unknown log level '{}'", self.log_level))
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_filter()?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "output_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 加载配置时回退到默认值的原因
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFallback {
    /// 配置文件不存在
    Missing(PathBuf),
    /// 配置文件存在但无法读取或解析
    Invalid(String),
}

impl fmt::Display for ConfigFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => {
                write!(f, "config file {} not found; using defaults", path.display())
            }
            Self::Invalid(reason) => write!(f, "{reason}; using defaults"),
        }
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("config serialization failed: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("config IO error: {0}")]
    Io(String),
    /// 验证失败
    #[error("invalid config: {0}")]
    ValidationFailed(String),
}
