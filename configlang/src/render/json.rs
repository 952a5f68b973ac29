//! JSON 渲染

use crate::error::EvalError;
use crate::value::Value;

/// 渲染为 JSON 文本（2 空格缩进，键按插入顺序）
///
/// 非有限浮点数（`inf`/`NaN`）在 JSON 中无法表示，返回
/// [`EvalError::Unserializable`]，不会被替换为 `null`。
pub fn to_json(value: &Value) -> Result<String, EvalError> {
    check_finite(value, "")?;
    serde_json::to_string_pretty(value).map_err(|e| EvalError::Unserializable {
        reason: e.to_string(),
    })
}

fn check_finite(value: &Value, path: &str) -> Result<(), EvalError> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(EvalError::Unserializable {
            reason: format!("non-finite number {f} at '{path}' has no JSON form"),
        }),
        Value::Int(_) | Value::Float(_) => Ok(()),
        Value::Mapping(m) => m.iter().try_for_each(|(key, item)| {
            let child = if path.is_empty() {
                key.to_string()
            } else {
                format!("{path}.{key}")
            };
            check_finite(item, &child)
        }),
    }
}
