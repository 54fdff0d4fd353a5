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

//! Layouts for formatting key-value sequences.
//!
//! A layout never terminates its output with a newline; that is up to the logger writing the
//! bytes.

use std::fmt;

use crate::Error;
use crate::kv::Value;

mod custom;
#[cfg(feature = "layout-json")]
mod json;
mod plain_text;

pub use self::custom::CustomLayout;
#[cfg(feature = "layout-json")]
pub use self::json::JsonLayout;
pub use self::plain_text::PlainTextLayout;

/// A layout for formatting key-value sequences.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a key-value sequence into a byte payload.
    fn format(&self, kvs: &[Value]) -> Result<Vec<u8>, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
