//! # Value 模块
//!
//! 求值结果（也是序列化器的输入）：数字，或有序、键唯一的映射。

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::EvalError;

/// 结构化值
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 映射
    Mapping(Mapping),
}

impl Value {
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// 数值（整数会被转换为 f64）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Mapping(_) => None,
        }
    }

    /// 数字的文本形式
    ///
    /// 整数按十进制输出；浮点数使用最短往返表示，总带小数部分或指数。
    /// 绝对值小于 1e-4 或不小于 1e16 时用指数形式，指数带符号且至少两位
    /// （`4.0`、`80.0`、`9.8`、`1e+16`、`1.5e-05`）。映射返回 `None`。
    pub fn number_text(&self) -> Option<String> {
        match self {
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(float_text(*f)),
            Self::Mapping(_) => None,
        }
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    // Debug 在同样的阈值切换到指数形式，只需补齐指数的符号与位数
    let text = format!("{f:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// 有序映射
///
/// 按插入顺序保存条目。键唯一性在插入时保证，之后不会再出现重复键。
/// 相等比较同时要求条目顺序一致。
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Value>,
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从条目序列构造，遇到重复键立即失败
    pub fn try_from_entries<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, EvalError> {
        let mut mapping = Self::new();
        for (key, value) in entries {
            mapping.insert(key, value)?;
        }
        Ok(mapping)
    }

    /// 插入条目
    ///
    /// 键已存在时返回 [`EvalError::DuplicateKey`]，映射保持不变。
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), EvalError> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => Err(EvalError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Mapping(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut m = Mapping::new();
        m.insert("zeta", Value::Float(1.0)).unwrap();
        m.insert("alpha", Value::Int(2)).unwrap();
        m.insert("mid", Value::Mapping(Mapping::new())).unwrap();

        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(m.get("alpha"), Some(&Value::Int(2)));
        assert_eq!(m.get("missing"), None);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut m = Mapping::new();
        m.insert("a", Value::Float(1.0)).unwrap();

        let err = m.insert("a", Value::Float(2.0)).unwrap_err();
        assert_eq!(
            err,
            EvalError::DuplicateKey {
                key: "a".to_string()
            }
        );
        // 原条目保持不变
        assert_eq!(m.get("a"), Some(&Value::Float(1.0)));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_equality_respects_order() {
        let ab = Mapping::try_from_entries([("a", Value::Int(1)), ("b", Value::Int(2))]).unwrap();
        let ba = Mapping::try_from_entries([("b", Value::Int(2)), ("a", Value::Int(1))]).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_many_keys_keep_order_and_uniqueness() {
        let keys: Vec<String> = (0..50_000).map(|i| format!("k{i}")).collect();
        let mut m = Mapping::new();
        for (i, key) in keys.iter().enumerate() {
            m.insert(key.as_str(), Value::Int(i as i64)).unwrap();
        }

        assert_eq!(m.len(), keys.len());
        assert!(m.keys().eq(keys.iter().map(String::as_str)));
        assert_eq!(m.get("k49999"), Some(&Value::Int(49_999)));
        assert!(m.insert("k0", Value::Int(0)).is_err());
    }

    #[test]
    fn test_try_from_entries() {
        let m = Mapping::try_from_entries([("a", Value::Int(1)), ("b", Value::Int(2))]).unwrap();
        assert_eq!(m.len(), 2);

        let err = Mapping::try_from_entries([("a", Value::Int(1)), ("a", Value::Int(2))]);
        assert!(matches!(err, Err(EvalError::DuplicateKey { key }) if key == "a"));
    }

    #[test]
    fn test_number_text() {
        assert_eq!(Value::Float(4.0).number_text().unwrap(), "4.0");
        assert_eq!(Value::Float(80.0).number_text().unwrap(), "80.0");
        assert_eq!(Value::Float(9.8).number_text().unwrap(), "9.8");
        assert_eq!(Value::Int(5).number_text().unwrap(), "5");
        assert_eq!(Value::Mapping(Mapping::new()).number_text(), None);
    }

    #[test]
    fn test_number_text_exponent_form() {
        let text = |f: f64| Value::Float(f).number_text().unwrap();
        assert_eq!(text(1e16), "1e+16");
        assert_eq!(text(-2.5e20), "-2.5e+20");
        assert_eq!(text(1e300), "1e+300");
        assert_eq!(text(1e-5), "1e-05");
        assert_eq!(text(1.5e-7), "1.5e-07");
        // 阈值内仍是小数形式
        assert_eq!(text(1e15), "1000000000000000.0");
        assert_eq!(text(0.0001), "0.0001");
        assert_eq!(text(0.0), "0.0");
        assert_eq!(text(f64::INFINITY), "inf");
        assert_eq!(text(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_accessors() {
        assert!(Value::Int(1).is_number());
        assert!(!Value::Mapping(Mapping::new()).is_number());
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert!(Value::Float(1.0).as_mapping().is_none());
    }
}
