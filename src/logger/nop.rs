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
use crate::logger::Errorer;
use crate::logger::Logger;
use crate::logger::SharedLogger;
use crate::logger::Wither;

/// A logger that discards all entries.
///
/// Binding context to a `NopLogger` yields another `NopLogger`, and it never has an error to
/// report.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct NopLogger {}

impl Logger for NopLogger {
    fn log(&self, _: &[Value]) -> Result<(), Error> {
        Ok(())
    }

    fn as_wither(&self) -> Option<&dyn Wither> {
        Some(self)
    }

    fn as_errorer(&self) -> Option<&dyn Errorer> {
        Some(self)
    }
}

impl Wither for NopLogger {
    fn with(&self, _: &[Value]) -> Result<SharedLogger, Error> {
        Ok(Arc::new(*self))
    }
}

impl Errorer for NopLogger {
    fn err(&self) -> Option<Error> {
        None
    }
}
