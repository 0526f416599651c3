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

use crate::Layout;
use crate::Logger;
use crate::Sink;
use crate::Tags;
use crate::Trap;

/// Configuration for building a [`Logger`], or for deriving one from an existing logger.
///
/// Every field is optional. When building a root logger, the name defaults to `"-"`, the
/// prefix to empty, the sink to standard error and the layout to
/// [`LineLayout`](crate::layout::LineLayout).
///
/// When passed to [`Logger::derive`], unset fields are inherited from the parent, and tags are
/// only added where the parent does not already have the key.
///
/// # Examples
///
/// ```
/// use logtag::Config;
/// use logtag::Tags;
///
/// let logger = Config::new()
///     .name("sas")
///     .prefix("SAS:")
///     .system_tags(Tags::from([("service", "sas"), ("region", "eu")]))
///     .app_tag("app", "billing")
///     .build();
/// ```
#[must_use = "call `build` to construct a logger or pass it to `Logger::derive`"]
#[derive(Debug, Default)]
pub struct Config {
    pub(super) sink: Option<Sink>,
    pub(super) name: Option<String>,
    pub(super) prefix: Option<String>,
    pub(super) system_tags: Tags,
    pub(super) app_tags: Tags,
    pub(super) layout: Option<Arc<dyn Layout>>,
    pub(super) trap: Option<Arc<dyn Trap>>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sink that lines are written to.
    ///
    /// Default to [`Sink::stderr`] for a root logger, or the parent's sink when deriving.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the name written on every line.
    ///
    /// An empty name counts as unset.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the prefix that app tags and per-call tags are rendered under.
    ///
    /// When deriving, an empty prefix counts as unset and the parent's prefix is kept.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add system tags, rendered without prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Config;
    /// use logtag::Tags;
    ///
    /// let logger = Config::new()
    ///     .system_tags(Tags::from([("request_id", "1234")]))
    ///     .build();
    /// assert_eq!(logger.system_tags().get("request_id"), Some("1234"));
    /// ```
    pub fn system_tags(mut self, tags: impl Into<Tags>) -> Self {
        let tags: Tags = tags.into();
        self.system_tags.extend(&tags);
        self
    }

    /// Add one system tag.
    pub fn system_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_tags.insert(key, value);
        self
    }

    /// Add app tags, rendered under the logger's prefix.
    pub fn app_tags(mut self, tags: impl Into<Tags>) -> Self {
        let tags: Tags = tags.into();
        self.app_tags.extend(&tags);
        self
    }

    /// Add one app tag.
    pub fn app_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.app_tags.insert(key, value);
        self
    }

    /// Set the layout that formats lines.
    ///
    /// Default to [`LineLayout`](crate::layout::LineLayout), or the parent's layout when
    /// deriving.
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        let layout: Box<dyn Layout> = layout.into();
        self.layout = Some(Arc::from(layout));
        self
    }

    /// Set a trap for write errors.
    ///
    /// With a trap, emission calls hand write errors to it and return `Ok(())`. Without one,
    /// emission calls return the error. Derived loggers inherit the parent's trap.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        let trap: Box<dyn Trap> = trap.into();
        self.trap = Some(Arc::from(trap));
        self
    }

    /// Build a root [`Logger`].
    pub fn build(self) -> Logger {
        Logger::new(self)
    }
}
