//! # Error 模块
//!
//! 定义 configlang 中使用的错误类型。
//!
//! - [`SyntaxError`]：文本不符合语法，总是在求值之前发现
//! - [`EvalError`]：语法正确但无法求值（或无法序列化）
//! - [`ConfigLangError`]：二者的统一类型，调用方据此决定退出行为

use thiserror::Error;

/// 语法错误
///
/// 所有变体都携带从 1 开始的行号与列号。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// 遇到不期望的字符
    #[error("line {line}, column {column}: unexpected character '{found}', expected {expected}")]
    UnexpectedChar {
        line: usize,
        column: usize,
        found: char,
        expected: String,
    },

    /// 输入意外结束（未闭合的结构等）
    #[error("line {line}, column {column}: unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        line: usize,
        column: usize,
        expected: String,
    },

    /// 数字字面量格式错误
    #[error("line {line}, column {column}: malformed number - {message}")]
    MalformedNumber {
        line: usize,
        column: usize,
        message: String,
    },

    /// 字典/定义嵌套过深
    #[error("line {line}, column {column}: nesting exceeds the maximum depth of {limit}")]
    TooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },

    /// 完整解析后仍有剩余内容
    #[error("line {line}, column {column}: unexpected trailing input '{found}'")]
    TrailingInput {
        line: usize,
        column: usize,
        found: String,
    },
}

impl SyntaxError {
    /// 错误位置 `(line, column)`
    pub fn position(&self) -> (usize, usize) {
        match self {
            Self::UnexpectedChar { line, column, .. }
            | Self::UnexpectedEnd { line, column, .. }
            | Self::MalformedNumber { line, column, .. }
            | Self::TooDeep { line, column, .. }
            | Self::TrailingInput { line, column, .. } => (*line, *column),
        }
    }
}

/// 求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 引用了尚未定义的常量
    #[error("undefined constant: {name}")]
    UndefinedConstant { name: String },

    /// 重复定义常量
    #[error("redefinition of constant: {name}")]
    Redefinition { name: String },

    /// 同一映射中出现重复的键（包括顶层合并）
    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    /// 空程序
    #[error("empty input")]
    EmptyProgram,

    /// 数字字面量无法转换为数值
    #[error("invalid numeric literal: {raw}")]
    InvalidNumber { raw: String },

    /// 值无法被序列化
    #[error("cannot serialize value: {reason}")]
    Unserializable { reason: String },
}

/// configlang 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigLangError {
    /// 语法错误
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// 求值错误
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl ConfigLangError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn is_eval(&self) -> bool {
        matches!(self, Self::Eval(_))
    }
}

/// Result 类型别名
pub type ConfigLangResult<T> = Result<T, ConfigLangError>;
