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

//! The [`Logger`] abstraction, its optional capabilities, and the built-in loggers.

use std::fmt;
use std::sync::Arc;

use crate::Error;
use crate::kv::Value;

mod context;
mod latch;
mod nop;
mod writer;

pub use self::context::ContextLogger;
pub use self::context::with;
pub(crate) use self::latch::ErrorLatch;
pub use self::nop::NopLogger;
pub use self::writer::WriterLogger;
pub use self::writer::WriterLoggerBuilder;

/// A shared, type-erased logger.
pub type SharedLogger = Arc<dyn Logger>;

/// The fundamental interface for all log operations.
///
/// [`Logger::log`] creates a log entry from `kvs`, a sequence of alternating keys and values. If
/// `kvs` has a length of one, implementations must treat the single value as a bare message.
///
/// Implementations must be safe for concurrent use. Any implementation that retains the values
/// of `kvs` must clone them.
///
/// Optional capabilities are advertised through the `as_*` probe methods, which return `None`
/// unless an implementation overrides them.
pub trait Logger: fmt::Debug + Send + Sync + 'static {
    /// Create a log entry from `kvs`.
    fn log(&self, kvs: &[Value]) -> Result<(), Error>;

    /// Return the context-binding capability of this logger, if any.
    fn as_wither(&self) -> Option<&dyn Wither> {
        None
    }

    /// Return the error-retrieval capability of this logger, if any.
    fn as_errorer(&self) -> Option<&dyn Errorer> {
        None
    }

    /// The concrete type name of this logger, used in diagnostic messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        (**self).log(kvs)
    }

    fn as_wither(&self) -> Option<&dyn Wither> {
        (**self).as_wither()
    }

    fn as_errorer(&self) -> Option<&dyn Errorer> {
        (**self).as_errorer()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

/// A logger that can bind key-value pairs more cheaply than generic wrapping.
///
/// [`Wither::with`] returns a new logger that adds `kvs` before the key-value pairs of every
/// subsequent log call. It must not mutate the receiver, and the returned logger must be
/// independent from it.
pub trait Wither {
    /// Return a new logger with `kvs` bound as context.
    ///
    /// An error means the backend could not produce a logger.
    fn with(&self, kvs: &[Value]) -> Result<SharedLogger, Error>;
}

/// A logger that retains the most recent error which it could not return from
/// [`Logger::log`].
pub trait Errorer {
    /// Return the most recent error, or `None` if no error occurred.
    ///
    /// Calling this method never clears the error.
    fn err(&self) -> Option<Error>;
}
