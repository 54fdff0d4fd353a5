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

//! Helpers for testing loggers and code that logs.

use std::io;
use std::sync::Arc;
use std::sync::Barrier;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::kv::Value;
use crate::logger::Logger;

/// A single entry stored by the [`TestLogger`].
#[derive(Debug, Clone, PartialEq)]
pub struct TestLogEntry {
    kvs: Vec<Value>,
}

impl TestLogEntry {
    /// The key-value sequence as it was passed to [`Logger::log`].
    pub fn kvs(&self) -> &[Value] {
        &self.kvs
    }

    /// Return the value of the first pair whose key renders as `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kvs
            .chunks_exact(2)
            .find(|pair| pair[0].try_to_string().is_ok_and(|k| k == key))
            .map(|pair| &pair[1])
    }

    /// Return the bare message if the entry consists of a single value.
    pub fn message(&self) -> Option<&Value> {
        match self.kvs.as_slice() {
            [message] => Some(message),
            _ => None,
        }
    }
}

/// A logger that stores entries without formatting them.
///
/// # Examples
///
/// ```
/// use kvlog::kvs;
/// use kvlog::logger::Logger;
/// use kvlog::testing::TestLogger;
///
/// let logger = TestLogger::default();
/// logger.log(&kvs!["user", "alice"]).unwrap();
/// assert_eq!(logger.count_matching(|e| e.get("user").is_some()), 1);
/// ```
#[derive(Debug, Default)]
pub struct TestLogger {
    entries: Mutex<Vec<TestLogEntry>>,
}

impl TestLogger {
    fn lock(&self) -> MutexGuard<'_, Vec<TestLogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A snapshot of all entries logged so far.
    pub fn entries(&self) -> Vec<TestLogEntry> {
        self.lock().clone()
    }

    /// The number of entries matching `pred`.
    pub fn count_matching(&self, pred: impl Fn(&TestLogEntry) -> bool) -> usize {
        self.lock().iter().filter(|e| pred(e)).count()
    }
}

impl Logger for TestLogger {
    fn log(&self, kvs: &[Value]) -> Result<(), Error> {
        let entry = TestLogEntry { kvs: kvs.to_vec() };
        self.lock().push(entry);
        Ok(())
    }
}

/// An [`io::Write`] sink whose contents can be inspected while a logger owns a clone of it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The bytes written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// The bytes written so far, lossily decoded as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Generate `n` key-value pairs `key0=value0` to `key{n-1}=value{n-1}`.
pub fn generate_kvs(n: usize) -> Vec<Value> {
    let mut kvs = Vec::with_capacity(n * 2);
    for i in 0..n {
        kvs.push(Value::from(format!("key{i}")));
        kvs.push(Value::from(format!("value{i}")));
    }
    kvs
}

/// Exercise the loggers returned by `factory` from `threads` threads at once.
///
/// Every thread obtains its own logger from `factory`, waits until all threads are ready, and
/// then logs `messages` entries of the form `thread=<t>, msg=<m>`, both counted from one. The
/// first error encountered is returned.
pub fn stress_test_logger<F, L>(factory: F, threads: usize, messages: usize) -> Result<(), Error>
where
    F: Fn() -> L + Sync,
    L: Logger,
{
    let start = Barrier::new(threads);
    let results = std::thread::scope(|s| {
        let handles = (0..threads)
            .map(|t| {
                let factory = &factory;
                let start = &start;
                s.spawn(move || -> Result<(), Error> {
                    let logger = factory();
                    start.wait();
                    for m in 0..messages {
                        logger.log(&[
                            Value::from("thread"),
                            Value::from(t + 1),
                            Value::from("msg"),
                            Value::from(m + 1),
                        ])?;
                    }
                    Ok(())
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });
    results.into_iter().collect()
}
