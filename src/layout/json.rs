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

use serde_json::Map;
use serde_json::Number;

use crate::Error;
use crate::ErrorKind;
use crate::Layout;
use crate::kv::MISSING_VALUE;
use crate::kv::Value;

/// A JSON layout for formatting key-value sequences.
///
/// Output format:
///
/// ```json
/// {"attempt":3,"ok":true,"user":"alice"}
/// {"message":"a bare message"}
/// ```
///
/// Keys are stringified; the order of keys in the object is not specified. A sequence of length
/// one is stored under `message`. A trailing key without a value is stored with the value
/// `error: missing value`.
///
/// Opaque values and non-finite floats cannot be represented and fail the format.
///
/// # Examples
///
/// ```
/// use kvlog::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct JsonLayout {}

fn to_json(key: &str, value: &Value) -> Result<serde_json::Value, Error> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::I64(v) => serde_json::Value::Number(Number::from(*v)),
        Value::U64(v) => serde_json::Value::Number(Number::from(*v)),
        Value::F64(v) => match Number::from_f64(*v) {
            Some(n) => serde_json::Value::Number(n),
            None => {
                return Err(
                    Error::new(ErrorKind::Format, "unsupported float value")
                        .with_context("key", key)
                        .with_context("value", v),
                );
            }
        },
        Value::Str(v) => serde_json::Value::String(v.to_string()),
        Value::Opaque(_) => {
            return Err(
                Error::new(ErrorKind::Format, "value is not serializable").with_context("key", key),
            );
        }
    };
    Ok(json)
}

impl Layout for JsonLayout {
    fn format(&self, kvs: &[Value]) -> Result<Vec<u8>, Error> {
        let mut entry = Map::new();

        if let [message] = kvs {
            entry.insert("message".to_string(), to_json("message", message)?);
        } else {
            let pairs = kvs.chunks_exact(2);
            let remainder = pairs.remainder();
            for pair in pairs {
                let key = pair[0].try_to_string().map_err(Error::from_fmt_error)?;
                let value = to_json(&key, &pair[1])?;
                entry.insert(key, value);
            }
            if let [key] = remainder {
                let key = key.try_to_string().map_err(Error::from_fmt_error)?;
                entry.insert(key, MISSING_VALUE.into());
            }
        }

        serde_json::to_vec(&entry).map_err(|err| {
            Error::new(ErrorKind::Format, "failed to serialize log entry").with_source(err)
        })
    }
}
