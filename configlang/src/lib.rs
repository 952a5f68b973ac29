//! # configlang
//!
//! 一个微型配置语言：数字字面量、具名常量、常量引用与嵌套字典，
//! 编译为单个结构化值，再渲染为 JSON 或 XML。
//!
//! ## 架构概述
//!
//! `configlang` 是纯逻辑核心，不依赖任何 IO。三个阶段依次执行：
//!
//! ```text
//! 文本 ──[parser]──► Vec<Expr> ──[eval]──► Value ──[render]──► JSON / XML
//! ```
//!
//! 语法错误总在求值之前发现；任何阶段出错都会立即中止，不产出部分结果。
//!
//! ## 使用示例
//!
//! ```ignore
//! use configlang::{parse_and_eval, to_xml};
//!
//! let value = parse_and_eval(
//!     "(define defaultport 8e+1) {service={workers=4e+0,port=.[defaultport].,},}",
//! )?;
//! assert_eq!(
//!     to_xml(&value)?,
//!     "<config><service><workers>4.0</workers><port>80.0</port></service></config>",
//! );
//! ```
//!
//! ## 模块结构
//!
//! - [`ast`]：AST 定义
//! - [`parser`]：语法解析
//! - [`eval`]：求值器与常量环境
//! - [`value`]：结构化值
//! - [`render`]：JSON / XML 渲染
//! - [`error`]：错误类型定义

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod render;
pub mod value;

// 重导出核心类型
pub use ast::{Expr, Program};
pub use error::{ConfigLangError, ConfigLangResult, EvalError, SyntaxError};
pub use eval::{Environment, eval_expr, eval_program};
pub use parser::{parse_expr, parse_program};
pub use render::{Format, render, to_json, to_xml};
pub use value::{Mapping, Value};

/// 解析并求值
pub fn parse_and_eval(text: &str) -> ConfigLangResult<Value> {
    let program = parse_program(text)?;
    Ok(eval_program(&program)?)
}

/// 解析、求值并按指定格式渲染
pub fn compile(text: &str, format: Format) -> ConfigLangResult<String> {
    let value = parse_and_eval(text)?;
    Ok(render(&value, format)?)
}
