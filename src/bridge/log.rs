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

use std::fmt;

use crate::Error;
use crate::Layout;
use crate::facade::MSG_ERROR;
use crate::kv::Value;
use crate::layout::PlainTextLayout;
use crate::logger::ErrorLatch;
use crate::logger::Errorer;
use crate::logger::Logger;
use crate::logger::SharedLogger;

/// A logger that formats entries with a [`Layout`] and emits them as records of the `log` crate.
///
/// The level of a record is taken from the value of the `level` key, or else the `lvl` key, if
/// it names a [`log::Level`]; `level` wins if both are present. Otherwise the configured default
/// level is used.
///
/// The `log` crate cannot report failures, so [`Logger::log`] always succeeds. If an entry
/// cannot be formatted, the error is retained for [`Errorer::err`] and reported as an
/// [`log::Level::Error`] record prefixed with [`MSG_ERROR`].
///
/// Do not use this logger behind [`setup_log_crate`]: every entry would be sent around in
/// circles.
///
/// # Examples
///
/// ```
/// use kvlog::bridge::LogCrateLogger;
///
/// let logger = LogCrateLogger::default()
///     .target("my_service")
///     .level(log::Level::Debug);
/// ```
#[derive(Debug)]
pub struct LogCrateLogger {
    target: String,
    level: log::Level,
    layout: Box<dyn Layout>,
    latch: ErrorLatch,
}

impl Default for LogCrateLogger {
    fn default() -> Self {
        Self {
            target: "kvlog".to_string(),
            level: log::Level::Info,
            layout: Box::new(PlainTextLayout::default()),
            latch: ErrorLatch::default(),
        }
    }
}

impl LogCrateLogger {
    /// Set the target of the emitted records.
    ///
    /// Default to `kvlog`.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the level of records whose entry names no level.
    ///
    /// Default to [`log::Level::Info`].
    pub fn level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }

    /// Set the layout for the record messages.
    ///
    /// Default to [`PlainTextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    fn level_of(&self, kvs: &[Value]) -> log::Level {
        let lookup = |name: &str| {
            kvs.chunks_exact(2)
                .find(|pair| pair[0] == name)
                .and_then(|pair| pair[1].try_to_string().ok())
                .and_then(|level| level.parse::<log::Level>().ok())
        };
        lookup("level")
            .or_else(|| lookup("lvl"))
            .unwrap_or(self.level)
    }

    fn emit(&self, level: log::Level, args: fmt::Arguments<'_>) {
        if level > log::max_level() {
            return;
        }
        log::Log::log(
            log::logger(),
            &log::Record::builder()
                .args(args)
                .level(level)
                .target(&self.target)
                .build(),
        );
    }
}

impl Logger for LogCrateLogger {
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        let level = self.level_of(kvs);
        match self.layout.format(kvs) {
            Ok(bytes) => {
                let message = String::from_utf8_lossy(&bytes);
                self.emit(level, format_args!("{message}"));
            }
            Err(err) => {
                let err = err.into_format_error();
                // reported without the layout
                self.emit(
                    log::Level::Error,
                    format_args!("{MSG_ERROR}: LogCrateLogger: {err}"),
                );
                self.latch.set(err);
            }
        }
        Ok(())
    }

    fn as_errorer(&self) -> Option<&dyn Errorer> {
        Some(self)
    }
}

impl Errorer for LogCrateLogger {
    fn err(&self) -> Option<Error> {
        self.latch.get()
    }
}

struct KvCollector<'a> {
    kvs: &'a mut Vec<Value>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.kvs.push(Value::display(key));
        self.kvs.push(Value::display(value));
        Ok(())
    }
}

/// A `log` crate logger that forwards every record to a kvlog [`Logger`].
///
/// A record becomes the entry `level=<LEVEL>, target=<target>, message=<message>` followed by
/// the record's own key-values.
#[derive(Debug)]
pub struct LogCrateProxy {
    logger: SharedLogger,
}

impl LogCrateProxy {
    /// Create a proxy forwarding to `logger`.
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }
}

impl log::Log for LogCrateProxy {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let mut kvs = vec![
            Value::from("level"),
            Value::from(record.level().as_str()),
            Value::from("target"),
            Value::from(record.target().to_string()),
            Value::from("message"),
            Value::display(record.args()),
        ];
        let mut visitor = KvCollector { kvs: &mut kvs };
        // a failing key-value source leaves the pairs visited so far
        let _ = record.key_values().visit(&mut visitor);
        let _ = self.logger.log(&kvs);
    }

    fn flush(&self) {}
}

/// Set up the log crate global logger to forward all records to `logger`.
///
/// This function calls [`log::set_boxed_logger`] with a [`LogCrateProxy`] and sets the global
/// maximum log level to `Trace`. To override this, call [`log::set_max_level`] after this
/// function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use kvlog::logger::NopLogger;
///
/// if let Err(err) = kvlog::bridge::try_setup_log_crate(Arc::new(NopLogger::default())) {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate(logger: SharedLogger) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogCrateProxy::new(logger)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger to forward all records to `logger`.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate(logger: SharedLogger) {
    try_setup_log_crate(logger).expect(
        "kvlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
