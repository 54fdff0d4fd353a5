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

//! Functions over any [`Logger`] that probe for optional capabilities at run time.
//!
//! These functions never fail. When a logger lacks a capability, or a capability does not behave
//! as expected, a diagnostic bare message is logged through the very same logger and a sensible
//! fallback is returned.

use crate::Error;
use crate::kv::Value;
use crate::logger::Logger;
use crate::logger::SharedLogger;

/// Prefix of messages logged because a logger does not support an operation.
///
/// Finding a message containing this value in your log indicates that you use a feature which
/// is not supported by your logger.
pub const MSG_UNSUPPORTED: &str = "[KVLOG UNSUPPORTED]";

/// Prefix of messages logged because an operation could not be performed.
///
/// Finding a message containing this value in your log usually indicates a bug or an
/// incompatibility in the logger's implementation, or a failure it could not return.
pub const MSG_ERROR: &str = "[KVLOG ERROR]";

/// Call [`Logger::log`] with `kvs` if `logger` is not `None`, discarding any error.
pub fn log(logger: Option<&SharedLogger>, kvs: &[Value]) {
    if let Some(logger) = logger {
        let _ = logger.log(kvs);
    }
}

/// Format the arguments into a single bare message and pass it to [`log`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use kvlog::logf;
/// use kvlog::logger::NopLogger;
/// use kvlog::logger::SharedLogger;
///
/// let logger: SharedLogger = Arc::new(NopLogger::default());
/// logf!(Some(&logger), "connected to {} in {}ms", "db-1", 12);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::facade::log(
            $logger,
            &[$crate::kv::Value::from(::std::format!($($arg)+))],
        )
    };
}

fn diagnose(logger: &dyn Logger, message: String) {
    let _ = logger.log(&[Value::from(message)]);
}

/// Try to create a logger that always adds `kvs` to the entries passed to `logger`.
///
/// This requires `logger` to provide the [`Wither`] capability. Otherwise a message prefixed
/// with [`MSG_UNSUPPORTED`] is logged through `logger`, and `logger` itself is returned. If the
/// capability fails to produce a logger, a message prefixed with [`MSG_ERROR`] is logged and
/// `logger` is returned as well.
///
/// It is safe to pass `None` for the logger; `None` is returned then. If `kvs` is empty, the
/// very same logger is returned.
///
/// Use [`crate::logger::with`] to fall back to a generic contextual logger instead.
///
/// [`Wither`]: crate::logger::Wither
pub fn with(logger: Option<SharedLogger>, kvs: &[Value]) -> Option<SharedLogger> {
    let logger = match logger {
        Some(logger) if !kvs.is_empty() => logger,
        logger => return logger,
    };
    let Some(wither) = logger.as_wither() else {
        let name = logger.type_name();
        diagnose(&*logger, format!("{MSG_UNSUPPORTED}: {name} does not implement With"));
        return Some(logger);
    };
    match wither.with(kvs) {
        Ok(derived) => Some(derived),
        Err(err) => {
            let name = logger.type_name();
            diagnose(
                &*logger,
                format!("{MSG_ERROR}: ({name}).With did not return a Logger: {err}"),
            );
            Some(logger)
        }
    }
}

/// Obtain the most recent error that occurred during logging.
///
/// This requires `logger` to provide the [`Errorer`] capability. Otherwise a message prefixed
/// with [`MSG_UNSUPPORTED`] is logged through `logger` and `None` is returned; no error is
/// assumed.
///
/// [`Errorer`]: crate::logger::Errorer
pub fn error(logger: Option<&SharedLogger>) -> Option<Error> {
    let logger = logger?;
    match logger.as_errorer() {
        Some(errorer) => errorer.err(),
        None => {
            let name = logger.type_name();
            diagnose(&**logger, format!("{MSG_UNSUPPORTED}: {name} does not implement Err"));
            None
        }
    }
}
