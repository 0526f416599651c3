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

use std::io;
use std::sync::Arc;

use jiff::Timestamp;

use crate::Config;
use crate::Error;
use crate::Layout;
use crate::Level;
use crate::Sink;
use crate::Tags;
use crate::Trap;
use crate::layout::LineLayout;
use crate::record::Record;
use crate::tags::resolve;
use crate::trap::DefaultTrap;

const DEFAULT_NAME: &str = "-";

/// A logger that writes one tagged text line per call.
///
/// A logger is immutable once built. Use [`Logger::derive`] to create a child logger that
/// inherits the name, prefix, tags and sink of its parent.
///
/// [`Logger::default`] is a logger without sink: every operation on it succeeds and writes
/// nothing.
///
/// # Examples
///
/// ```
/// use logtag::Config;
/// use logtag::Sink;
/// use logtag::Tags;
/// use logtag::sink::Buffer;
///
/// let buffer = Buffer::new();
/// let logger = Config::new()
///     .name("sas")
///     .prefix("SAS:")
///     .sink(Sink::new(buffer.clone()))
///     .system_tag("request_id", "1234")
///     .app_tag("app", "app")
///     .build();
///
/// logger
///     .info("testing", Some(&Tags::from([("per-call", "per-call")])))
///     .unwrap();
///
/// assert!(buffer.contents().ends_with(concat!(
///     r#" INFO sas "testing" request_id="1234" SAS:.app="app" SAS:.per-call="per-call""#,
///     "\n"
/// )));
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    prefix: String,
    system_tags: Tags,
    app_tags: Tags,
    sink: Option<Sink>,
    layout: Arc<dyn Layout>,
    trap: Option<Arc<dyn Trap>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            prefix: String::new(),
            system_tags: Tags::new(),
            app_tags: Tags::new(),
            sink: None,
            layout: Arc::new(LineLayout::default()),
            trap: None,
        }
    }
}

impl Logger {
    /// Create a root logger from the given configuration.
    ///
    /// See [`Config`] for the defaults of unset fields.
    pub fn new(config: Config) -> Self {
        let Config {
            sink,
            name,
            prefix,
            system_tags,
            app_tags,
            layout,
            trap,
        } = config;

        Self {
            name: name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            prefix: prefix.unwrap_or_default(),
            system_tags,
            app_tags,
            sink: Some(sink.unwrap_or_default()),
            layout: layout.unwrap_or_else(|| Arc::new(LineLayout::default())),
            trap,
        }
    }

    /// Create a child logger from this one.
    ///
    /// * The name and prefix are replaced when `config` sets them to a non-empty value.
    /// * The tags start as a copy of this logger's tags. Tags from `config` are added only where
    ///   the key is new; existing tags are never replaced.
    /// * The sink, layout and trap are shared with this logger unless `config` sets them.
    ///
    /// This logger is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Config;
    ///
    /// let parent = Config::new().name("sas").system_tag("orig_key", "orig_value").build();
    /// let child = parent.derive(
    ///     Config::new()
    ///         .name("worker")
    ///         .system_tag("orig_key", "new_value")
    ///         .system_tag("extra", "extra"),
    /// );
    ///
    /// assert_eq!(child.name(), "worker");
    /// assert_eq!(child.system_tags().get("orig_key"), Some("orig_value"));
    /// assert_eq!(child.system_tags().get("extra"), Some("extra"));
    /// assert!(!parent.system_tags().contains_key("extra"));
    /// ```
    pub fn derive(&self, config: Config) -> Logger {
        let Config {
            sink,
            name,
            prefix,
            system_tags,
            app_tags,
            layout,
            trap,
        } = config;

        Logger {
            name: name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| self.name.clone()),
            prefix: prefix
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or_else(|| self.prefix.clone()),
            system_tags: self.system_tags.derive(&system_tags),
            app_tags: self.app_tags.derive(&app_tags),
            sink: sink.or_else(|| self.sink.clone()),
            layout: layout.unwrap_or_else(|| self.layout.clone()),
            trap: trap.or_else(|| self.trap.clone()),
        }
    }

    /// The name written on every line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix that app tags and per-call tags are rendered under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The system tags of this logger.
    pub fn system_tags(&self) -> &Tags {
        &self.system_tags
    }

    /// The app tags of this logger.
    pub fn app_tags(&self) -> &Tags {
        &self.app_tags
    }

    /// The sink of this logger, if any.
    pub fn sink(&self) -> Option<&Sink> {
        self.sink.as_ref()
    }

    /// Write one line with the given level, message and per-call tags.
    ///
    /// # Errors
    ///
    /// Return the sink's write error, unless the logger has a [`Trap`], in which case the error
    /// is handed to the trap and `Ok(())` is returned.
    pub fn log(&self, level: Level, message: &str, tags: Option<&Tags>) -> Result<(), Error> {
        match (self.emit(level, message, tags), &self.trap) {
            (Err(err), Some(trap)) => {
                trap.trap(&err);
                Ok(())
            }
            (result, _) => result,
        }
    }

    /// Write one line at the `INFO` level.
    pub fn info(&self, message: &str, tags: Option<&Tags>) -> Result<(), Error> {
        self.log(Level::Info, message, tags)
    }

    /// Write one line at the `DEBUG` level.
    pub fn debug(&self, message: &str, tags: Option<&Tags>) -> Result<(), Error> {
        self.log(Level::Debug, message, tags)
    }

    /// Write one line at the `WARN` level.
    pub fn warn(&self, message: &str, tags: Option<&Tags>) -> Result<(), Error> {
        self.log(Level::Warn, message, tags)
    }

    /// Write one line at the `ERROR` level.
    pub fn error(&self, message: &str, tags: Option<&Tags>) -> Result<(), Error> {
        self.log(Level::Error, message, tags)
    }

    /// Flush the sink.
    pub fn flush(&self) -> Result<(), Error> {
        match &self.sink {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        message: &str,
        tags: Option<&Tags>,
    ) -> Result<(), Error> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };

        let pairs = resolve(&self.system_tags, &self.prefix, &self.app_tags, tags);
        let record = Record::new(Timestamp::now(), level, &self.name, message, pairs);

        let mut bytes = self.layout.format(&record)?;
        bytes.push(b'\n');
        sink.write_line(&bytes)
            .map_err(|err| err.with_context("name", &self.name))
    }

    /// Hand an error without a caller to return it to over to the trap.
    pub(crate) fn report(&self, err: &Error) {
        match &self.trap {
            Some(trap) => trap.trap(err),
            None => DefaultTrap::default().trap(err),
        }
    }
}

/// Use the logger as the output of another text logger.
///
/// Each write is logged as one `INFO` line without tags, with trailing whitespace removed.
/// The write always reports the full buffer as consumed; failures go to the logger's trap, or
/// to standard error without one.
impl io::Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        if let Err(err) = self.emit(Level::Info, message.trim_end(), None) {
            self.report(&err);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Err(err) = Logger::flush(*self) {
            self.report(&err);
        }
        Ok(())
    }
}

impl io::Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut &*self)
    }
}
