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

use std::sync::Arc;

use crate::Error;
use crate::kv::Value;
use crate::kv::pad_to_even;
use crate::logger::Logger;
use crate::logger::SharedLogger;
use crate::logger::Wither;

/// Create a contextual logger, i.e., a logger that always adds `kvs` to the final log entry.
///
/// If `logger` provides its own [`Wither`] capability, that is used. Otherwise `logger` is
/// wrapped in a [`ContextLogger`]; an odd `kvs` gets its trailing key paired with
/// `error: missing value`.
///
/// It is safe to pass `None` for the logger; `None` is returned then. If `kvs` is empty, the
/// very same logger is returned.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use kvlog::kvs;
/// use kvlog::logger::NopLogger;
/// use kvlog::logger::SharedLogger;
///
/// let base: SharedLogger = Arc::new(NopLogger::default());
/// let request = kvlog::logger::with(Some(base), &kvs!["request_id", 42]);
/// assert!(request.is_some());
///
/// assert!(kvlog::logger::with(None, &kvs!["a", "b"]).is_none());
/// ```
pub fn with(logger: Option<SharedLogger>, kvs: &[Value]) -> Option<SharedLogger> {
    let logger = match logger {
        Some(logger) if !kvs.is_empty() => logger,
        logger => return logger,
    };
    if let Some(wither) = logger.as_wither() {
        // a backend that cannot bind context still gets the generic wrapper below
        if let Ok(logger) = wither.with(kvs) {
            return Some(logger);
        }
    }
    Some(Arc::new(ContextLogger::new(Some(logger), kvs)))
}

/// A logger that binds a fixed key-value prefix to a wrapped logger.
///
/// The bound key-value pairs are immutable and always of even length. Deriving a new
/// `ContextLogger` with [`ContextLogger::with`] never changes the one it is derived from, so a
/// `ContextLogger` can be handed to many threads without synchronization.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    ctx: Arc<[Value]>,
    inner: Option<SharedLogger>,
}

impl ContextLogger {
    /// Create a contextual logger that adds `kvs` to every entry passed on to `inner`.
    ///
    /// A `None` logger discards all entries.
    pub fn new(inner: Option<SharedLogger>, kvs: &[Value]) -> Self {
        Self {
            ctx: pad_to_even(kvs).into(),
            inner,
        }
    }

    /// Return a new contextual logger with `kvs` appended to the bound key-value pairs.
    ///
    /// Without any `kvs` the returned logger shares its storage with `self`.
    pub fn with(&self, kvs: &[Value]) -> ContextLogger {
        if kvs.is_empty() {
            return self.clone();
        }
        let mut ctx = Vec::with_capacity(self.ctx.len() + kvs.len() + 1);
        // self.ctx is of even length, so padding the extension pads the whole
        ctx.extend_from_slice(&self.ctx);
        ctx.extend(pad_to_even(kvs));
        ContextLogger {
            ctx: ctx.into(),
            inner: self.inner.clone(),
        }
    }

    /// The bound key-value pairs.
    pub fn context(&self) -> &[Value] {
        &self.ctx
    }

    /// The wrapped logger.
    pub fn inner(&self) -> Option<&SharedLogger> {
        self.inner.as_ref()
    }
}

impl Logger for ContextLogger {
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        let Some(inner) = self.inner.as_ref() else {
            return Ok(());
        };
        let mut merged = Vec::with_capacity(self.ctx.len() + kvs.len());
        merged.extend_from_slice(&self.ctx);
        merged.extend_from_slice(kvs);
        inner.log(&merged)
    }

    fn as_wither(&self) -> Option<&dyn Wither> {
        Some(self)
    }
}

/// Without any `kvs` the returned logger is a new `Arc` around a logger that shares its bound
/// pairs and its inner logger with `self`. Use [`with`] to get the very same `Arc` back.
impl Wither for ContextLogger {
    fn with(&self, kvs: &[Value]) -> Result<SharedLogger, Error> {
        Ok(Arc::new(ContextLogger::with(self, kvs)))
    }
}
