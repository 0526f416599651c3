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

use crate::Error;
use crate::Logger;
use crate::Tags;

struct TagsVisitor {
    tags: Tags,
}

impl<'kvs> log::kv::VisitSource<'kvs> for TagsVisitor {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.tags.insert(key.as_str(), value.to_string());
        Ok(())
    }
}

/// Every record is written; the `log` facade's level is the only filter.
///
/// The record's key-values become per-call tags. `Trace` records are written as `DEBUG`.
impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        self.sink().is_some()
    }

    fn log(&self, record: &log::Record) {
        let mut visitor = TagsVisitor { tags: Tags::new() };
        if let Err(err) = record.key_values().visit(&mut visitor) {
            let err = Error::new("failed to visit key-values").with_context("error", err);
            self.report(&err);
        }

        let tags = visitor.tags;
        let call = (!tags.is_empty()).then_some(&tags);
        let message = record.args().to_string();
        if let Err(err) = self.emit(record.level().into(), &message, call) {
            self.report(&err);
        }
    }

    fn flush(&self) {
        if let Err(err) = Logger::flush(self) {
            self.report(&err);
        }
    }
}

impl Logger {
    /// Set up this logger as the global [`log`] logger.
    ///
    /// The maximum level of the `log` facade is set to `Trace`, so every record reaches the
    /// logger.
    ///
    /// # Errors
    ///
    /// Return an error if a global logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Config;
    ///
    /// let logger = Config::new().name("sas").build();
    /// if logger.try_apply().is_err() {
    ///     eprintln!("failed to set logger");
    /// }
    /// ```
    pub fn try_apply(self) -> Result<(), Error> {
        log::set_boxed_logger(Box::new(self))
            .map_err(|err| Error::new("failed to set global logger").with_source(err))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    /// Set up this logger as the global [`log`] logger.
    ///
    /// # Panics
    ///
    /// Panic if the global logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("Logger::apply must be called before the global logger initialized");
    }
}
