//! Typed key-value pairs carried by every record.
//!
//! A record is an ordered list of [`KeyValue`]s. Values are a small closed set
//! of types so emitters can render them without dynamic dispatch. Two
//! [`Valuer`]s are resolved lazily when the record is rendered, which is how
//! the default logger stamps time and call site at emission time.

use super::*;
use std::{borrow::Cow, panic::Location};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl KeyValue {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Level(Level),
    /// Explicit absence, rendered as `null`.
    Null,
    /// Stands in for the value of an unpaired trailing key.
    Missing,
    Valuer(Valuer),
}

/// A value computed when the record is rendered rather than when the
/// logger was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valuer {
    /// Current time in UTC, RFC 3339.
    TimestampUtc,
    /// `file:line` of the logging call.
    Caller,
}

pub const MISSING_VALUE: &str = "(MISSING)";

impl Valuer {
    pub fn resolve(&self, location: &Location<'_>) -> String {
        match self {
            Valuer::TimestampUtc => {
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
            }
            Valuer::Caller => {
                let file = location.file();
                let file = file.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file);
                format!("{}:{}", file, location.line())
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Valuer::TimestampUtc => "ts",
            Valuer::Caller => "caller",
        }
    }
}

impl Value {
    /// Plain text of the value, without any quoting.
    pub fn text(&self, location: &Location<'_>) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::I64(i) => Cow::Owned(i.to_string()),
            Value::U64(u) => Cow::Owned(u.to_string()),
            Value::F64(f) => Cow::Owned(f.to_string()),
            Value::Level(level) => Cow::Borrowed(level.as_str()),
            Value::Null => Cow::Borrowed("null"),
            Value::Missing => Cow::Borrowed(MISSING_VALUE),
            Value::Valuer(valuer) => Cow::Owned(valuer.resolve(location)),
        }
    }

    fn into_key(self) -> Cow<'static, str> {
        match self {
            Value::Str(s) => Cow::Owned(s),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::I64(i) => Cow::Owned(i.to_string()),
            Value::U64(u) => Cow::Owned(u.to_string()),
            Value::F64(f) => Cow::Owned(f.to_string()),
            Value::Level(level) => Cow::Borrowed(level.as_str()),
            Value::Null => Cow::Borrowed("null"),
            Value::Missing => Cow::Borrowed(MISSING_VALUE),
            Value::Valuer(valuer) => Cow::Borrowed(valuer.label()),
        }
    }
}

/// Groups a flat `key, value, key, value, ...` sequence into pairs.
///
/// An unpaired trailing key gets [`Value::Missing`].
pub fn pairs<I, V>(flat: I) -> Vec<KeyValue>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let mut iter = flat.into_iter().map(Into::<Value>::into);
    let (lower, _) = iter.size_hint();
    let mut kvs = Vec::with_capacity(lower / 2 + 1);
    while let Some(key) = iter.next() {
        let value = iter.next().unwrap_or(Value::Missing);
        kvs.push(KeyValue {
            key: key.into_key(),
            value,
        });
    }
    kvs
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::Str(value.into_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_int!(I64, i64, i8, i16, i32, i64, isize);
impl_from_int!(U64, u64, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<Level> for Value {
    fn from(value: Level) -> Self {
        Value::Level(value)
    }
}

impl From<Valuer> for Value {
    fn from(value: Valuer) -> Self {
        Value::Valuer(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds an array of [`KeyValue`]s: `kv!("user" => "alice", "id" => 7)`.
#[macro_export]
macro_rules! kv {
    () => {
        [] as [$crate::KeyValue; 0]
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        [$($crate::KeyValue::new($key, $value)),+]
    };
}
