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

use std::fmt::Debug;
use std::fmt::Formatter;

use crate::Error;
use crate::kv::Value;
use crate::layout::Layout;

type FormatFunction = dyn Fn(&[Value]) -> Result<Vec<u8>, Error> + Send + Sync + 'static;

/// A layout that you can pass the custom format function.
///
/// The custom format function accepts the key-value sequence and returns the byte payload. For
/// example:
///
/// ```rust
/// use kvlog::kv::Value;
/// use kvlog::layout::CustomLayout;
///
/// let layout = CustomLayout::new(|kvs: &[Value]| {
///     let fields = kvs.iter().map(ToString::to_string).collect::<Vec<_>>();
///     Ok(fields.join(" ").into_bytes())
/// });
/// ```
pub struct CustomLayout {
    f: Box<FormatFunction>,
}

impl Debug for CustomLayout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    pub fn new(
        layout: impl Fn(&[Value]) -> Result<Vec<u8>, Error> + Send + Sync + 'static,
    ) -> Self {
        CustomLayout {
            f: Box::new(layout),
        }
    }
}

impl Layout for CustomLayout {
    fn format(&self, kvs: &[Value]) -> Result<Vec<u8>, Error> {
        (self.f)(kvs)
    }
}
