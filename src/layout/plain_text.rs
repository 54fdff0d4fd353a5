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

use std::fmt::Write;

use crate::Error;
use crate::Layout;
use crate::kv::MISSING_VALUE;
use crate::kv::Value;

/// A layout that formats key-value sequences as plain text.
///
/// Output format:
///
/// ```text
/// user=alice, attempt=3, ok=true
/// user=alice, attempt=error: missing value
/// a bare message
/// ```
///
/// A sequence of length one is written as its value alone. A trailing key without a value is
/// paired with `error: missing value`.
///
/// # Examples
///
/// ```
/// use kvlog::kvs;
/// use kvlog::layout::Layout;
/// use kvlog::layout::PlainTextLayout;
///
/// let layout = PlainTextLayout::default();
/// let bytes = layout.format(&kvs!["key", "value", "key2"]).unwrap();
/// assert_eq!(bytes, b"key=value, key2=error: missing value");
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct PlainTextLayout {}

impl Layout for PlainTextLayout {
    fn format(&self, kvs: &[Value]) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        if let [message] = kvs {
            write!(&mut text, "{message}").map_err(Error::from_fmt_error)?;
            return Ok(text.into_bytes());
        }

        let pairs = kvs.chunks_exact(2);
        let remainder = pairs.remainder();
        for pair in pairs {
            if !text.is_empty() {
                text.push_str(", ");
            }
            write!(&mut text, "{}={}", pair[0], pair[1]).map_err(Error::from_fmt_error)?;
        }
        if let [key] = remainder {
            if !text.is_empty() {
                text.push_str(", ");
            }
            write!(&mut text, "{key}={MISSING_VALUE}").map_err(Error::from_fmt_error)?;
        }

        Ok(text.into_bytes())
    }
}
