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
use std::io::Write;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::Layout;
use crate::facade::MSG_ERROR;
use crate::kv::Value;
use crate::layout::PlainTextLayout;
use crate::logger::ErrorLatch;
use crate::logger::Errorer;
use crate::logger::Logger;

/// A builder to configure and create a [`WriterLogger`].
pub struct WriterLoggerBuilder<W> {
    writer: W,
    layout: Box<dyn Layout>,
    newline: bool,
    latching: bool,
}

impl<W> fmt::Debug for WriterLoggerBuilder<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLoggerBuilder")
            .field("layout", &self.layout)
            .field("newline", &self.newline)
            .field("latching", &self.latching)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> WriterLoggerBuilder<W> {
    /// Create a new builder writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            layout: Box::new(PlainTextLayout::default()),
            newline: true,
            latching: false,
        }
    }

    /// Set the layout for the log entries.
    ///
    /// Default to [`PlainTextLayout`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kvlog::layout::JsonLayout;
    /// use kvlog::logger::WriterLoggerBuilder;
    ///
    /// let builder = WriterLoggerBuilder::new(std::io::stdout()).layout(JsonLayout::default());
    /// ```
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set whether every entry, including bare messages, is terminated by `\n`.
    ///
    /// Default to `true`.
    pub fn newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    /// Set whether errors are kept back from the caller.
    ///
    /// A latching logger always returns `Ok(())` from [`Logger::log`]. Failures are retained
    /// for [`Errorer::err`] and reported with a best-effort line written straight to the
    /// writer, bypassing the layout.
    ///
    /// Default to `false`: errors are returned to the caller, and retained as well.
    pub fn latching(mut self, latching: bool) -> Self {
        self.latching = latching;
        self
    }

    /// Build the [`WriterLogger`].
    pub fn build(self) -> WriterLogger<W> {
        let WriterLoggerBuilder {
            writer,
            layout,
            newline,
            latching,
        } = self;
        WriterLogger {
            writer: Mutex::new(writer),
            layout,
            newline,
            latching,
            latch: ErrorLatch::default(),
        }
    }
}

/// A logger that formats entries with a [`Layout`] and writes them to an [`io::Write`].
///
/// The writer is protected by a mutex, so every entry is written in one piece even if the
/// logger is used from many threads. Formatting happens before the lock is taken.
///
/// The most recent error is retained and can be retrieved with [`Errorer::err`]; a later
/// successful log call does not clear it.
///
/// [`io::Write`]: std::io::Write
///
/// # Examples
///
/// ```
/// use kvlog::kvs;
/// use kvlog::layout::PlainTextLayout;
/// use kvlog::logger::Logger;
/// use kvlog::logger::WriterLogger;
///
/// let logger = WriterLogger::new(Vec::new(), PlainTextLayout::default());
/// logger.log(&kvs!["user", "alice", "ok", true]).unwrap();
/// ```
pub struct WriterLogger<W: Write + Send + 'static> {
    writer: Mutex<W>,
    layout: Box<dyn Layout>,
    newline: bool,
    latching: bool,
    latch: ErrorLatch,
}

impl<W: Write + Send + 'static> fmt::Debug for WriterLogger<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLogger")
            .field("layout", &self.layout)
            .field("newline", &self.newline)
            .field("latching", &self.latching)
            .field("latch", &self.latch)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> WriterLogger<W> {
    /// Create a new error-returning logger writing newline-terminated entries to `writer`.
    pub fn new(writer: W, layout: impl Into<Box<dyn Layout>>) -> Self {
        WriterLoggerBuilder::new(writer).layout(layout).build()
    }

    /// Create a [`WriterLoggerBuilder`] writing to `writer`.
    pub fn builder(writer: W) -> WriterLoggerBuilder<W> {
        WriterLoggerBuilder::new(writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer();
        writer.flush().map_err(Error::from_io_error)?;
        Ok(())
    }

    fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fail(&self, err: Error, writer: Option<&mut W>) -> Result<(), Error> {
        self.latch.set(err.clone());
        if !self.latching {
            return Err(err);
        }

        // Try to report the error. This may fail if the error occurred due to problems
        // writing to the writer.
        let report = |writer: &mut W| {
            let _ = writeln!(writer, "{MSG_ERROR}: WriterLogger: {err}");
        };
        match writer {
            Some(writer) => report(writer),
            None => report(&mut *self.writer()),
        }
        Ok(())
    }
}

impl<W: Write + Send + 'static> Logger for WriterLogger<W> {
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        if kvs.is_empty() {
            return Ok(());
        }

        let mut bytes = match self.layout.format(kvs) {
            Ok(bytes) => bytes,
            Err(err) => return self.fail(err.into_format_error(), None),
        };
        if self.newline {
            bytes.push(b'\n');
        }

        let mut writer = self.writer();
        match writer.write_all(&bytes) {
            Ok(()) => Ok(()),
            Err(err) => self.fail(Error::from_io_error(err), Some(&mut *writer)),
        }
    }

    fn as_errorer(&self) -> Option<&dyn Errorer> {
        Some(self)
    }
}

impl<W: Write + Send + 'static> Errorer for WriterLogger<W> {
    fn err(&self) -> Option<Error> {
        self.latch.get()
    }
}

impl<W: Write + Send + 'static> Drop for WriterLogger<W> {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}
