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

//! A single log line before it is laid out.

use jiff::Timestamp;

use crate::Level;
use crate::tags::Pair;

/// The payload of a log line.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: Timestamp,

    level: Level,
    name: &'a str,
    message: &'a str,

    // resolved tags, in rendering order
    pairs: Vec<Pair<'a>>,
}

impl<'a> Record<'a> {
    /// Create a new record.
    pub fn new(
        now: Timestamp,
        level: Level,
        name: &'a str,
        message: &'a str,
        pairs: Vec<Pair<'a>>,
    ) -> Self {
        Self {
            now,
            level,
            name,
            message,
            pairs,
        }
    }

    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.now
    }

    /// The level of the line.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The name of the emitting logger.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The message, unquoted.
    pub fn message(&self) -> &'a str {
        self.message
    }

    /// The resolved tags, system tags first.
    pub fn pairs(&self) -> &[Pair<'a>] {
        &self.pairs
    }
}
