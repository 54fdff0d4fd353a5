// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The module for key-value sequences passed to a logger.
//!
//! A key-value sequence is a plain slice of [`Value`]s, semantically alternating key, value,
//! key, value, and so on. A sequence of odd length is well-defined: the trailing key is paired
//! with [`MISSING_VALUE`]. A sequence of length one is a bare message.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The placeholder paired with a trailing key that has no value.
pub const MISSING_VALUE: &str = "error: missing value";

/// An opaque, printable value in a key-value sequence.
///
/// Values are cheap to clone: strings are either static or owned once, and opaque values are
/// reference counted.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(Cow<'static, str>),
    /// A value that can be printed but not serialized, e.g. a callback.
    Opaque(Arc<dyn fmt::Display + Send + Sync>),
}

impl Value {
    /// Render `value` into a string value right away.
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Str(Cow::Owned(value.to_string()))
    }

    /// Keep `value` as is; it is rendered each time the entry is formatted.
    ///
    /// Structured layouts refuse opaque values.
    pub fn opaque(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Return the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Render this value into a string, failing instead of panicking if an opaque value's
    /// `Display` implementation returns an error.
    pub fn try_to_string(&self) -> Result<String, fmt::Error> {
        if let Some(s) = self.as_str() {
            return Ok(s.to_string());
        }
        let mut text = String::new();
        fmt::Write::write_fmt(&mut text, format_args!("{self}"))?;
        Ok(text)
    }

    /// Whether this is the [`MISSING_VALUE`] placeholder.
    pub fn is_missing(&self) -> bool {
        self.as_str() == Some(MISSING_VALUE)
    }

    pub(crate) fn missing() -> Self {
        Value::Str(Cow::Borrowed(MISSING_VALUE))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => fmt::Display::fmt(v, f),
            Value::I64(v) => fmt::Display::fmt(v, f),
            Value::U64(v) => fmt::Display::fmt(v, f),
            Value::F64(v) => fmt::Display::fmt(v, f),
            Value::Str(v) => fmt::Display::fmt(v, f),
            Value::Opaque(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Opaque(v) => f
                .debug_tuple("Opaque")
                .field(&format_args!("{v}"))
                .finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // opaque values have no notion of equality besides identity
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Cow::Owned(value))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(Cow::Owned(value.clone()))
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(value: Cow<'static, str>) -> Self {
        Value::Str(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Str(Cow::Owned(value.to_string()))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $repr:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $repr)
                }
            }
        )+
    };
}

impl_from_int!(I64, i64, i8, i16, i32, i64, isize);
impl_from_int!(U64, u64, u8, u16, u32, u64, usize);
impl_from_int!(F64, f64, f32, f64);

/// Build a `Vec<Value>` key-value sequence from anything convertible into [`Value`].
///
/// # Examples
///
/// ```
/// use kvlog::kvs;
///
/// let kvs = kvs!["user", "alice", "attempt", 3, "ok", true];
/// assert_eq!(kvs.len(), 6);
/// ```
#[macro_export]
macro_rules! kvs {
    () => {
        ::std::vec::Vec::<$crate::kv::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        ::std::vec![$($crate::kv::Value::from($v)),+]
    };
}

/// Copy `kvs` into a new vector, appending [`MISSING_VALUE`] when its length is odd.
pub(crate) fn pad_to_even(kvs: &[Value]) -> Vec<Value> {
    let mut padded = Vec::with_capacity(kvs.len() + kvs.len() % 2);
    padded.extend_from_slice(kvs);
    if padded.len() % 2 != 0 {
        padded.push(Value::missing());
    }
    padded
}
