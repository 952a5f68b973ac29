//! # Render 模块
//!
//! 把 [`Value`] 渲染为层级文本格式。两个渲染器彼此独立，都是纯函数。
//!
//! - [`json`]：JSON，2 空格缩进，保持键的插入顺序
//! - [`xml`]：以 `<config>` 为根元素的 XML

pub mod json;
pub mod xml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::value::Value;

pub use json::to_json;
pub use xml::to_xml;

/// 输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[default]
    Xml,
}

impl Format {
    /// 对应的文件扩展名（不含点）
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(format!("unknown output format '{other}' (expected json or xml)")),
        }
    }
}

/// 按指定格式渲染
pub fn render(value: &Value, format: Format) -> Result<String, EvalError> {
    match format {
        Format::Json => to_json(value),
        Format::Xml => to_xml(value),
    }
}
