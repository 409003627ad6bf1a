//! JsonML input values.
//!
//! JsonML usually arrives as JSON, but attribute objects may also carry values
//! JSON cannot express (functions, dates, symbols, `undefined`). The attribute
//! and inspector rules treat those differently, so they get their own variants.

use crate::host::DomError;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<FixedOffset>),
    Function(Function),
    /// A symbol with its optional description.
    Symbol(Option<String>),
    Array(Vec<Value>),
    /// Keys are unique; insertion order is kept.
    Object(Vec<(String, Value)>),
}

/// A callable attribute value. Only its source text is observable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    source: String,
}

impl Function {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Coarse value categories driving attribute and child handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Function,
    Array,
    PlainObject,
    Scalar,
}

impl Value {
    pub fn function(source: impl Into<String>) -> Self {
        Value::Function(Function::new(source))
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Some(description.into()))
    }

    pub fn date(at: DateTime<FixedOffset>) -> Self {
        Value::Date(at)
    }

    /// Builds an object; a repeated key overwrites the earlier value in place.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut out = Vec::new();
        for (key, value) in entries {
            insert_entry(&mut out, key.into(), value);
        }
        Value::Object(out)
    }

    /// Dates count as scalars: they are opaque values, not attribute bags.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined | Value::Null => ValueKind::Null,
            Value::Function(_) => ValueKind::Function,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::PlainObject,
            Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Date(_)
            | Value::Symbol(_) => ValueKind::Scalar,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Date(_)
            | Value::Function(_)
            | Value::Symbol(_)
            | Value::Array(_)
            | Value::Object(_) => true,
        }
    }

    /// String conversion as performed when a value lands in an attribute.
    pub fn to_display_string(&self) -> Result<String, DomError> {
        Ok(match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(at) => format_date(at),
            Value::Function(f) => f.source.clone(),
            Value::Symbol(_) => return Err(DomError::SymbolToString),
            Value::Array(items) => {
                let mut out = String::new();
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        out.push(',');
                    }
                    if item.kind() != ValueKind::Null {
                        out.push_str(&item.to_display_string()?);
                    }
                }
                out
            }
            Value::Object(_) => "[object Object]".to_string(),
        })
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Date(at) => at.timestamp_millis() as f64,
            Value::Array(_) => match self.to_display_string() {
                Ok(s) => parse_number(&s),
                Err(_) => f64::NAN,
            },
            Value::Function(_) | Value::Symbol(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// JSON form used by the inspector. `None` for values JSON drops.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => None,
            Value::Null => Some(Json::Null),
            Value::Bool(b) => Some(Json::Bool(*b)),
            Value::Number(n) => Some(json_number(*n)),
            Value::String(s) => Some(Json::String(s.clone())),
            Value::Date(at) => Some(Json::String(
                at.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Value::Array(items) => Some(Json::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(Json::Null))
                    .collect(),
            )),
            Value::Object(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    if let Some(json) = value.to_json() {
                        map.insert(key.clone(), json);
                    }
                }
                Some(Json::Object(map))
            }
        }
    }
}

pub(crate) fn insert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

pub(crate) fn describe_symbol(description: Option<&str>) -> String {
    format!("Symbol({})", description.unwrap_or(""))
}

pub(crate) fn format_date(at: &DateTime<FixedOffset>) -> String {
    at.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

/// Shortest round-trip number text, exponent form outside `[1e-6, 1e21)`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            s.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn json_number(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Date(at.fixed_offset())
    }
}
