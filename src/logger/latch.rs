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

use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;

/// Holds the most recent error of a logger. It is overwritten by newer errors and never reset.
#[derive(Debug, Default)]
pub(crate) struct ErrorLatch {
    last: Mutex<Option<Error>>,
}

impl ErrorLatch {
    fn last(&self) -> MutexGuard<'_, Option<Error>> {
        self.last.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set(&self, err: Error) {
        *self.last() = Some(err);
    }

    pub(crate) fn get(&self) -> Option<Error> {
        self.last().clone()
    }
}
