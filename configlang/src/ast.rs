//! # AST 模块
//!
//! 定义解析器产出的抽象语法树。
//!
//! AST 是一棵有限树（无回边），由解析器一次性构造，之后不可变。
//! `Expr` 是封闭的和类型，求值器对其做穷尽匹配。

use serde::{Deserialize, Serialize};

/// 表达式 AST 节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// 数字字面量
    ///
    /// 保存源码中的原始文本，整数/浮点数的判定推迟到求值阶段
    Number(String),

    /// 常量引用 `.[name].`
    Ref(String),

    /// 常量定义 `(define name expr)`
    Define { name: String, value: Box<Expr> },

    /// 字典字面量 `{key=expr, ...}`
    ///
    /// 保留条目顺序；语法上允许重复键，重复在求值时才报错
    Dict(Vec<(String, Expr)>),
}

impl Expr {
    /// 创建数字字面量
    pub fn number(raw: impl Into<String>) -> Self {
        Self::Number(raw.into())
    }

    /// 创建常量引用
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// 创建常量定义
    pub fn define(name: impl Into<String>, value: Expr) -> Self {
        Self::Define {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// 创建字典
    pub fn dict<K: Into<String>>(items: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Self::Dict(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// 是否为字典节点（顶层合并只接受字典形状的表达式）
    pub fn is_dict(&self) -> bool {
        matches!(self, Self::Dict(_))
    }
}

/// 程序：顶层表达式序列
pub type Program = Vec<Expr>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let expr = Expr::dict([
            ("a", Expr::define("x", Expr::number("1e+0"))),
            ("b", Expr::reference("x")),
        ]);

        let Expr::Dict(items) = &expr else {
            panic!("expected dict");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "a");
        assert_eq!(
            items[0].1,
            Expr::Define {
                name: "x".to_string(),
                value: Box::new(Expr::Number("1e+0".to_string())),
            }
        );
        assert_eq!(items[1].1, Expr::Ref("x".to_string()));
        assert!(expr.is_dict());
        assert!(!items[1].1.is_dict());
    }

    #[test]
    fn test_ast_serializes_for_dumps() {
        let expr = Expr::define("g", Expr::number("9.8e+0"));
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(json, r#"{"Define":{"name":"g","value":{"Number":"9.8e+0"}}}"#);

        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
