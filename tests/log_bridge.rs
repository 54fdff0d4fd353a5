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

//! Entries passed to [`LogCrateLogger`] arrive as `log` crate records.

use std::fmt;
use std::sync::Mutex;
use std::sync::OnceLock;

use kvlog::Error;
use kvlog::ErrorKind;
use kvlog::Logger;
use kvlog::bridge::LogCrateLogger;
use kvlog::facade::MSG_ERROR;
use kvlog::kv::Value;
use kvlog::kvs;
use kvlog::layout::CustomLayout;
use kvlog::logger::Errorer;

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    level: log::Level,
    target: String,
    message: String,
}

#[derive(Debug, Default)]
struct Capture {
    records: Mutex<Vec<Captured>>,
}

impl log::Log for Capture {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let captured = Captured {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        self.records.lock().unwrap().push(captured);
    }

    fn flush(&self) {}
}

fn capture() -> &'static Capture {
    static CAPTURE: OnceLock<&'static Capture> = OnceLock::new();
    CAPTURE.get_or_init(|| {
        let capture: &'static Capture = Box::leak(Box::default());
        log::set_logger(capture).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
        capture
    })
}

fn records_for(target: &str) -> Vec<Captured> {
    capture()
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.target == target)
        .cloned()
        .collect()
}

#[test]
fn entries_become_records() {
    capture();
    let logger = LogCrateLogger::default().target("entries_become_records");
    logger.log(&kvs!["user", "alice", "ok", true]).unwrap();
    logger.log(&kvs!["bare message"]).unwrap();

    let records = records_for("entries_become_records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, log::Level::Info);
    assert_eq!(records[0].message, "user=alice, ok=true");
    assert_eq!(records[1].message, "bare message");
}

#[test]
fn level_is_taken_from_the_entry() {
    capture();
    let logger = LogCrateLogger::default()
        .target("level_is_taken_from_the_entry")
        .level(log::Level::Debug);
    logger.log(&kvs!["level", "warn", "msg", "a"]).unwrap();
    logger.log(&kvs!["lvl", "error", "msg", "b"]).unwrap();
    logger.log(&kvs!["lvl", "trace", "level", "ERROR", "msg", "c"]).unwrap();
    logger.log(&kvs!["level", "loud", "msg", "d"]).unwrap();
    logger.log(&kvs!["msg", "e"]).unwrap();

    let levels = records_for("level_is_taken_from_the_entry")
        .into_iter()
        .map(|r| r.level)
        .collect::<Vec<_>>();
    assert_eq!(
        levels,
        vec![
            log::Level::Warn,
            log::Level::Error,
            log::Level::Error,
            log::Level::Debug,
            log::Level::Debug,
        ]
    );
}

struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn unprintable_level_is_reported_without_panicking() {
    capture();
    let logger = LogCrateLogger::default()
        .target("unprintable_level_is_reported_without_panicking")
        .level(log::Level::Warn);
    logger
        .log(&[Value::from("level"), Value::opaque(Broken)])
        .unwrap();

    // the entry itself cannot be formatted either
    let err = logger.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to format log entry, sources: [an error occurred when formatting an argument]"
    );

    let records = records_for("unprintable_level_is_reported_without_panicking");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, log::Level::Error);
}

#[test]
fn unprintable_lvl_does_not_hide_level() {
    capture();
    let logger = LogCrateLogger::default()
        .target("unprintable_lvl_does_not_hide_level")
        .layout(CustomLayout::new(|_: &[Value]| Ok(b"formatted".to_vec())));
    logger
        .log(&[
            Value::from("lvl"),
            Value::opaque(Broken),
            Value::from("level"),
            Value::from("debug"),
        ])
        .unwrap();
    logger
        .log(&[Value::from("lvl"), Value::opaque(Broken)])
        .unwrap();
    assert!(logger.err().is_none());

    let levels = records_for("unprintable_lvl_does_not_hide_level")
        .into_iter()
        .map(|r| r.level)
        .collect::<Vec<_>>();
    assert_eq!(levels, vec![log::Level::Debug, log::Level::Info]);
}

#[test]
fn format_errors_are_reported_and_latched() {
    capture();
    let logger = LogCrateLogger::default()
        .target("format_errors_are_reported_and_latched")
        .layout(CustomLayout::new(|_: &[Value]| {
            Err(Error::new(ErrorKind::Unexpected, "layout broke"))
        }));
    assert!(logger.err().is_none());

    logger.log(&kvs!["key", "value"]).unwrap();
    let err = logger.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);

    let records = records_for("format_errors_are_reported_and_latched");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, log::Level::Error);
    assert_eq!(
        records[0].message,
        format!("{MSG_ERROR}: LogCrateLogger: {err}")
    );
}
