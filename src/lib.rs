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

//! Kvlog is a logging facade over key-value sequences.
//!
//! # Overview
//!
//! A [`Logger`] only has to implement a single method that receives an ordered sequence of
//! alternating keys and values. On top of that, kvlog provides contextual loggers that bind
//! key-value pairs across nested scopes, layouts that turn sequences into bytes, and a logger
//! that writes to any [`std::io::Write`] safely from many threads.
//!
//! Optional capabilities, binding context with [`logger::Wither`] and retrieving errors with
//! [`logger::Errorer`], are probed at run time by the functions in [`facade`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use kvlog::kvs;
//! use kvlog::layout::PlainTextLayout;
//! use kvlog::logger::SharedLogger;
//! use kvlog::logger::WriterLogger;
//!
//! let base: SharedLogger = Arc::new(WriterLogger::new(std::io::stderr(), PlainTextLayout::default()));
//! let request = kvlog::logger::with(Some(base), &kvs!["request_id", 42]);
//! let handler = kvlog::logger::with(request, &kvs!["handler", "login"]);
//!
//! // request_id=42, handler=login, user=alice
//! kvlog::facade::log(handler.as_ref(), &kvs!["user", "alice"]);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod facade;
pub mod kv;
pub mod layout;
pub mod logger;
pub mod testing;

mod error;
pub use error::Error;
pub use error::ErrorKind;

pub use layout::Layout;
pub use logger::Logger;
pub use logger::SharedLogger;
