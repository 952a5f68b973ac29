//! XML 渲染
//!
//! 输出形如 `<config><service><port>80.0</port></service></config>`：
//! 无 XML 声明、无属性、无命名空间，元素之间不插入空白。

use std::fmt::Write;

use crate::error::EvalError;
use crate::value::Value;

/// 根元素名
pub const ROOT_TAG: &str = "config";

/// 渲染为 XML 文本
///
/// - 映射的每个条目成为以键命名的子元素
/// - 数字成为所在元素的文本内容；顶层的裸数字直接作为根元素的文本
/// - 空映射渲染为自闭合元素 `<key />`
pub fn to_xml(value: &Value) -> Result<String, EvalError> {
    let mut out = String::new();
    write_element(&mut out, ROOT_TAG, value)?;
    Ok(out)
}

fn write_element(out: &mut String, tag: &str, value: &Value) -> Result<(), EvalError> {
    check_tag(tag)?;
    match value {
        Value::Mapping(m) if m.is_empty() => {
            let _ = write!(out, "<{tag} />");
        }
        Value::Mapping(m) => {
            let _ = write!(out, "<{tag}>");
            for (key, item) in m.iter() {
                write_element(out, key, item)?;
            }
            let _ = write!(out, "</{tag}>");
        }
        Value::Int(_) | Value::Float(_) => {
            let text = value
                .number_text()
                .ok_or_else(|| EvalError::Unserializable {
                    reason: format!("element <{tag}> has no text form"),
                })?;
            let _ = write!(out, "<{tag}>{text}</{tag}>");
        }
    }
    Ok(())
}

/// 校验元素名：首字符为 ASCII 字母或 `_`，其余为字母、数字、`_`、`-`、`.`
fn check_tag(tag: &str) -> Result<(), EvalError> {
    let mut chars = tag.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(EvalError::Unserializable {
            reason: format!("'{tag}' is not a valid XML element name"),
        })
    }
}
