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
use std::io;
use std::io::Write;
use std::sync::Arc;

use kvlog::Error;
use kvlog::ErrorKind;
use kvlog::Logger;
use kvlog::SharedLogger;
use kvlog::facade;
use kvlog::facade::MSG_ERROR;
use kvlog::kv::Value;
use kvlog::kvs;
use kvlog::layout::CustomLayout;
use kvlog::layout::JsonLayout;
use kvlog::layout::PlainTextLayout;
use kvlog::logger::Errorer;
use kvlog::logger::WriterLogger;
use kvlog::testing::SharedBuffer;

/// A writer that fails the next `failures` writes and then appends to `buf`.
#[derive(Debug, Default)]
struct FlakyWriter {
    failures: usize,
    buf: SharedBuffer,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::other("device unavailable"));
        }
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn failing_layout() -> CustomLayout {
    CustomLayout::new(|_: &[Value]| Err(Error::new(ErrorKind::Unexpected, "layout broke")))
}

#[test]
fn plain_text_entries_are_newline_terminated() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), PlainTextLayout::default());
    logger.log(&kvs!["key", "value", "key2"]).unwrap();
    logger.log(&kvs!["bare message"]).unwrap();
    insta::assert_snapshot!(buf.to_string_lossy(), @r"
    key=value, key2=error: missing value
    bare message
    ");
}

#[test]
fn newline_can_be_turned_off() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::builder(buf.clone()).newline(false).build();
    logger.log(&kvs!["a", 1]).unwrap();
    logger.log(&kvs!["b", 2]).unwrap();
    assert_eq!(buf.to_string_lossy(), "a=1b=2");
}

#[test]
fn empty_sequence_writes_nothing() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), PlainTextLayout::default());
    logger.log(&[]).unwrap();
    assert!(buf.contents().is_empty());
}

#[test]
fn json_entries() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), JsonLayout::default());
    logger.log(&kvs!["key1", "value1", "key2"]).unwrap();
    insta::assert_snapshot!(
        buf.to_string_lossy().trim_end(),
        @r#"{"key1":"value1","key2":"error: missing value"}"#
    );
}

#[test]
fn write_error_is_returned_and_latched() {
    let writer = FlakyWriter {
        failures: 1,
        ..Default::default()
    };
    let buf = writer.buf.clone();
    let logger = WriterLogger::new(writer, PlainTextLayout::default());
    assert!(logger.err().is_none());

    let err = logger.log(&kvs!["key", "value"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Write);
    assert!(err.to_string().contains("device unavailable"), "{err}");

    // a later success keeps the latched error
    logger.log(&kvs!["key", "value2"]).unwrap();
    let latched = logger.err().unwrap();
    assert_eq!(latched.kind(), ErrorKind::Write);
    assert_eq!(latched.to_string(), err.to_string());
    assert_eq!(buf.to_string_lossy(), "key=value2\n");
}

#[test]
fn format_error_is_returned_and_latched() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), failing_layout());

    let err = logger.log(&kvs!["key", "value"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("layout broke"), "{err}");
    assert_eq!(logger.err().unwrap().kind(), ErrorKind::Format);
    assert!(buf.contents().is_empty());
}

struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn layout_format_errors_are_not_wrapped_again() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), PlainTextLayout::default());

    let err = logger
        .log(&[Value::from("key"), Value::opaque(Broken)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to format log entry, sources: [an error occurred when formatting an argument]"
    );
    assert!(buf.contents().is_empty());
}

#[test]
fn unprintable_json_key_is_a_format_error() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::new(buf.clone(), JsonLayout::default());

    let err = logger
        .log(&[Value::opaque(Broken), Value::from("v")])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(logger.err().unwrap().kind(), ErrorKind::Format);
    assert!(buf.contents().is_empty());
}

#[test]
fn latest_error_wins() {
    let writer = FlakyWriter {
        failures: 1,
        ..Default::default()
    };
    let logger = WriterLogger::new(writer, JsonLayout::default());
    logger.log(&kvs!["key", "value"]).unwrap_err();
    assert_eq!(logger.err().unwrap().kind(), ErrorKind::Write);

    logger.log(&[Value::from("callback"), Value::opaque("fn()")]).unwrap_err();
    assert_eq!(logger.err().unwrap().kind(), ErrorKind::Format);
}

#[test]
fn latching_logger_reports_format_errors_to_the_writer() {
    let buf = SharedBuffer::default();
    let logger = WriterLogger::builder(buf.clone())
        .layout(failing_layout())
        .latching(true)
        .build();

    logger.log(&kvs!["key", "value"]).unwrap();
    let err = logger.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(
        buf.to_string_lossy(),
        format!("{MSG_ERROR}: WriterLogger: {err}\n")
    );
}

#[test]
fn latching_logger_drops_a_failing_report() {
    let writer = FlakyWriter {
        failures: 2,
        ..Default::default()
    };
    let buf = writer.buf.clone();
    let logger = WriterLogger::builder(writer).latching(true).build();

    // the entry and the report both fail
    logger.log(&kvs!["key", "value"]).unwrap();
    assert_eq!(logger.err().unwrap().kind(), ErrorKind::Write);
    assert!(buf.contents().is_empty());

    logger.log(&kvs!["key", "value2"]).unwrap();
    assert_eq!(buf.to_string_lossy(), "key=value2\n");
}

#[test]
fn facade_error_reads_the_latch() {
    let writer = FlakyWriter {
        failures: 1,
        ..Default::default()
    };
    let logger: SharedLogger = Arc::new(WriterLogger::new(writer, PlainTextLayout::default()));
    assert!(facade::error(Some(&logger)).is_none());

    facade::log(Some(&logger), &kvs!["key", "value"]);
    let err = facade::error(Some(&logger)).unwrap();
    assert_eq!(err.kind(), ErrorKind::Write);
}

#[test]
fn facade_with_on_writer_logger_is_unsupported() {
    let buf = SharedBuffer::default();
    let logger: SharedLogger = Arc::new(WriterLogger::new(buf.clone(), PlainTextLayout::default()));
    let same = facade::with(Some(logger.clone()), &kvs!["a", "b"]).unwrap();
    assert!(Arc::ptr_eq(&same, &logger));

    let output = buf.to_string_lossy();
    assert!(output.starts_with("[KVLOG UNSUPPORTED]: kvlog::logger::"), "{output}");
    assert!(output.ends_with("does not implement With\n"), "{output}");
}

#[test]
fn context_over_writer_logger() {
    let buf = SharedBuffer::default();
    let base: SharedLogger = Arc::new(WriterLogger::new(buf.clone(), PlainTextLayout::default()));
    let request = kvlog::logger::with(Some(base), &kvs!["request_id", 7]);
    let handler = kvlog::logger::with(request.clone(), &kvs!["handler"]);

    facade::log(handler.as_ref(), &kvs!["user", "alice"]);
    facade::log(request.as_ref(), &kvs!["status", 200]);
    insta::assert_snapshot!(buf.to_string_lossy(), @r"
    request_id=7, handler=error: missing value, user=alice
    request_id=7, status=200
    ");
}

#[test]
fn file_sink_is_flushed_explicitly_and_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kvlog.log");
    let file = std::fs::File::create(&path).unwrap();

    let logger = WriterLogger::builder(io::BufWriter::new(file))
        .layout(JsonLayout::default())
        .build();
    logger.log(&kvs!["x"]).unwrap();
    logger.flush().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"message\":\"x\"}\n");

    logger.log(&kvs!["count", 2u64, "ok", true]).unwrap();
    drop(logger);

    let contents = std::fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents, @r#"
    {"message":"x"}
    {"count":2,"ok":true}
    "#);
}
