//! # 求值模块
//!
//! 以深度优先、从左到右的顺序遍历 AST，产出 [`Value`]。
//!
//! ## 求值规则
//!
//! - 整个程序共享**一个**扁平的常量环境，不按字典或定义划分作用域
//! - 定义不会提升：引用必须出现在定义之后
//! - 常量只能赋值一次
//! - 字典条目按书写顺序求值，先定义的常量对后面的兄弟条目可见
//! - 遇到第一个错误立即中止，不返回部分结果

use std::collections::HashMap;

use crate::ast::Expr;
use crate::error::EvalError;
use crate::value::{Mapping, Value};

/// 常量环境
///
/// 在求值一个程序时创建，随 `define` 增长，程序结束后丢弃。
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// 绑定新常量，名称已存在时返回 [`EvalError::Redefinition`]
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.contains(name) {
            return Err(EvalError::Redefinition {
                name: name.to_string(),
            });
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// 对整个程序求值
///
/// 所有字典形状的顶层表达式的条目按顺序合并为一个映射（跨表达式的重复键同样报错）；
/// 若没有任何顶层字典，则返回最后一个顶层表达式的值。
pub fn eval_program(program: &[Expr]) -> Result<Value, EvalError> {
    if program.is_empty() {
        return Err(EvalError::EmptyProgram);
    }

    let mut env = Environment::new();
    let mut config = Mapping::new();
    let mut has_config = false;
    let mut last = None;

    for expr in program {
        let value = eval_expr(expr, &mut env)?;
        if expr.is_dict() {
            has_config = true;
            if let Value::Mapping(entries) = &value {
                for (key, item) in entries.iter() {
                    config.insert(key, item.clone())?;
                }
            }
        }
        last = Some(value);
    }

    if has_config {
        return Ok(Value::Mapping(config));
    }
    last.ok_or(EvalError::EmptyProgram)
}

/// 在给定环境中对单个表达式求值
pub fn eval_expr(expr: &Expr, env: &mut Environment) -> Result<Value, EvalError> {
    match expr {
        Expr::Number(raw) => parse_number(raw),

        Expr::Ref(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedConstant { name: name.clone() }),

        Expr::Define { name, value } => {
            if env.contains(name) {
                return Err(EvalError::Redefinition { name: name.clone() });
            }
            let value = eval_expr(value, env)?;
            // 值表达式内部可能已经定义了同名常量
            env.define(name, value.clone())?;
            Ok(value)
        }

        Expr::Dict(items) => {
            let mut mapping = Mapping::new();
            for (key, value_expr) in items {
                // 先检查重复，再求值：重复条目的值表达式不会执行
                if mapping.contains_key(key) {
                    return Err(EvalError::DuplicateKey { key: key.clone() });
                }
                let value = eval_expr(value_expr, env)?;
                mapping.insert(key.as_str(), value)?;
            }
            Ok(Value::Mapping(mapping))
        }
    }
}

/// 把原始数字文本转换为数值
///
/// 含 `.`、`e` 或 `E` 时为浮点数，否则为整数。
fn parse_number(raw: &str) -> Result<Value, EvalError> {
    let invalid = || EvalError::InvalidNumber {
        raw: raw.to_string(),
    };

    if raw.contains(['.', 'e', 'E']) {
        raw.parse::<f64>().map(Value::Float).map_err(|_| invalid())
    } else {
        raw.parse::<i64>().map(Value::Int).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Mapping(Mapping::try_from_entries(entries).unwrap())
    }

    #[test]
    fn test_number_float_int_discrimination() {
        let mut env = Environment::new();
        assert_eq!(
            eval_expr(&Expr::number("1e+3"), &mut env).unwrap(),
            Value::Float(1000.0)
        );
        assert_eq!(
            eval_expr(&Expr::number("9.8e+0"), &mut env).unwrap(),
            Value::Float(9.8)
        );
        assert_eq!(
            eval_expr(&Expr::number("2.5"), &mut env).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            eval_expr(&Expr::number("42"), &mut env).unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            eval_expr(&Expr::number("-7"), &mut env).unwrap(),
            Value::Int(-7)
        );
    }

    #[test]
    fn test_invalid_number() {
        let mut env = Environment::new();
        let err = eval_expr(&Expr::number("99999999999999999999"), &mut env).unwrap_err();
        assert!(matches!(err, EvalError::InvalidNumber { .. }));

        let err = eval_expr(&Expr::number("1.2.3e0"), &mut env).unwrap_err();
        assert!(matches!(err, EvalError::InvalidNumber { raw } if raw == "1.2.3e0"));
    }

    #[test]
    fn test_define_binds_and_returns_value() {
        let mut env = Environment::new();
        let value = eval_expr(&Expr::define("x", Expr::number("2e+0")), &mut env).unwrap();
        assert_eq!(value, Value::Float(2.0));
        assert_eq!(env.get("x"), Some(&Value::Float(2.0)));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_undefined_reference() {
        let mut env = Environment::new();
        let err = eval_expr(&Expr::reference("x"), &mut env).unwrap_err();
        assert_eq!(err.to_string(), "undefined constant: x");
    }

    #[test]
    fn test_redefinition() {
        let mut env = Environment::new();
        eval_expr(&Expr::define("x", Expr::number("1e+0")), &mut env).unwrap();
        let err = eval_expr(&Expr::define("x", Expr::number("2e+0")), &mut env).unwrap_err();
        assert_eq!(err.to_string(), "redefinition of constant: x");
        // 原绑定不变
        assert_eq!(env.get("x"), Some(&Value::Float(1.0)));
    }

    #[test]
    fn test_redefinition_inside_own_value() {
        let mut env = Environment::new();
        let expr = Expr::define("x", Expr::define("x", Expr::number("1e+0")));
        let err = eval_expr(&expr, &mut env).unwrap_err();
        assert!(matches!(err, EvalError::Redefinition { name } if name == "x"));
    }

    #[test]
    fn test_define_value_not_hoisted() {
        let mut env = Environment::new();
        let expr = Expr::define("x", Expr::reference("x"));
        let err = eval_expr(&expr, &mut env).unwrap_err();
        assert!(matches!(err, EvalError::UndefinedConstant { .. }));
        assert!(env.is_empty());
    }

    #[test]
    fn test_dict_sibling_sees_earlier_define() {
        let mut env = Environment::new();
        let expr = Expr::dict([
            ("a", Expr::define("x", Expr::number("1e+0"))),
            ("b", Expr::reference("x")),
        ]);
        let value = eval_expr(&expr, &mut env).unwrap();
        assert_eq!(
            value,
            mapping([("a", Value::Float(1.0)), ("b", Value::Float(1.0))])
        );
        // 定义在字典之外仍然可见
        assert!(env.contains("x"));
    }

    #[test]
    fn test_dict_sibling_cannot_see_later_define() {
        let mut env = Environment::new();
        let expr = Expr::dict([
            ("b", Expr::reference("x")),
            ("a", Expr::define("x", Expr::number("1e+0"))),
        ]);
        let err = eval_expr(&expr, &mut env).unwrap_err();
        assert!(matches!(err, EvalError::UndefinedConstant { name } if name == "x"));
    }

    #[test]
    fn test_duplicate_key_side_effects_up_to_failure() {
        let mut env = Environment::new();
        let expr = Expr::dict([
            ("a", Expr::define("x", Expr::number("1e+0"))),
            ("a", Expr::define("y", Expr::number("2e+0"))),
        ]);
        let err = eval_expr(&expr, &mut env).unwrap_err();
        assert_eq!(err.to_string(), "duplicate key: a");
        // 第一个条目的定义已经生效，重复条目的值没有执行
        assert!(env.contains("x"));
        assert!(!env.contains("y"));
    }

    #[test]
    fn test_nested_dict_sees_outer_constants() {
        let mut env = Environment::new();
        env.define("g", Value::Float(9.8)).unwrap();
        let expr = Expr::dict([("inner", Expr::dict([("g", Expr::reference("g"))]))]);
        let value = eval_expr(&expr, &mut env).unwrap();
        assert_eq!(
            value,
            mapping([("inner", mapping([("g", Value::Float(9.8))]))])
        );
    }

    #[test]
    fn test_program_merges_top_level_dicts() {
        let program = vec![
            Expr::dict([("a", Expr::number("1e+0"))]),
            Expr::define("x", Expr::number("2e+0")),
            Expr::dict([("b", Expr::reference("x"))]),
        ];
        assert_eq!(
            eval_program(&program).unwrap(),
            mapping([("a", Value::Float(1.0)), ("b", Value::Float(2.0))])
        );
    }

    #[test]
    fn test_program_duplicate_across_dicts() {
        let program = vec![
            Expr::dict([("a", Expr::number("1e+0"))]),
            Expr::dict([("a", Expr::number("2e+0"))]),
        ];
        let err = eval_program(&program).unwrap_err();
        assert!(matches!(err, EvalError::DuplicateKey { key } if key == "a"));
    }

    #[test]
    fn test_program_without_dict_returns_last_value() {
        let program = vec![
            Expr::define("x", Expr::number("1e+0")),
            Expr::reference("x"),
        ];
        assert_eq!(eval_program(&program).unwrap(), Value::Float(1.0));
    }

    #[test]
    fn test_program_define_of_dict_does_not_merge() {
        // 只有字典形状的顶层表达式参与合并
        let program = vec![
            Expr::define("x", Expr::dict([("a", Expr::number("1e+0"))])),
            Expr::dict([("b", Expr::number("2e+0"))]),
        ];
        assert_eq!(
            eval_program(&program).unwrap(),
            mapping([("b", Value::Float(2.0))])
        );
    }

    #[test]
    fn test_empty_dict_still_yields_mapping() {
        let program = vec![Expr::number("1e+0"), Expr::Dict(vec![])];
        assert_eq!(
            eval_program(&program).unwrap(),
            Value::Mapping(Mapping::new())
        );
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(eval_program(&[]), Err(EvalError::EmptyProgram));
    }
}
