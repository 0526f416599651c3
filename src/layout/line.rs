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

use std::fmt::Write;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Layout;
use crate::quote::write_maybe_quoted;
use crate::quote::write_quoted;
use crate::record::Record;

/// A layout that formats a log record as one tokenizable text line.
///
/// Output format:
///
/// ```text
/// 2024-08-11 14:44:57.172 INFO sas "user logged in" request_id="1234" SAS:.app="billing" SAS:.user="42"
/// 2024-08-11 14:44:57.173 DEBUG sas "cache miss" request_id="1234" SAS:.app="billing"
/// 2024-08-11 14:44:57.180 ERROR - "disk full"
/// ```
///
/// The timestamp is UTC with millisecond precision. The message and every tag value are
/// double-quoted; the name is quoted only when it would not be a single token otherwise.
///
/// # Examples
///
/// ```
/// use logtag::layout::LineLayout;
///
/// let layout = LineLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineLayout {
    timestamp_format: Option<fn(Timestamp) -> String>,
}

impl LineLayout {
    /// Set a user-defined timestamp format function.
    ///
    /// Default to [`format_timestamp`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::layout::LineLayout;
    ///
    /// let layout = LineLayout::default().timestamp_format(|ts| ts.as_millisecond().to_string());
    /// ```
    pub fn timestamp_format(mut self, format: fn(Timestamp) -> String) -> Self {
        self.timestamp_format = Some(format);
        self
    }
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
///
/// # Examples
///
/// ```
/// use jiff::Timestamp;
/// use logtag::layout::format_timestamp;
///
/// assert_eq!(format_timestamp(Timestamp::UNIX_EPOCH), "1970-01-01 00:00:00.000");
/// ```
pub fn format_timestamp(ts: Timestamp) -> String {
    let dt = ts.to_zoned(TimeZone::UTC).datetime();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.millisecond(),
    )
}

impl Layout for LineLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = match self.timestamp_format {
            Some(format) => format(record.time()),
            None => format_timestamp(record.time()),
        };

        write!(&mut text, " {} ", record.level()).map_err(Error::from_fmt_error)?;
        write_maybe_quoted(&mut text, record.name()).map_err(Error::from_fmt_error)?;
        text.push(' ');
        write_quoted(&mut text, record.message()).map_err(Error::from_fmt_error)?;

        for pair in record.pairs() {
            write!(&mut text, " {pair}").map_err(Error::from_fmt_error)?;
        }

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::Tags;
    use crate::tags::resolve;

    fn fixed() -> Timestamp {
        Timestamp::from_millisecond(1_700_000_000_123).unwrap()
    }

    fn format(layout: &LineLayout, record: &Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    #[test]
    fn formats_timestamp_in_utc_with_millis() {
        assert_eq!(format_timestamp(fixed()), "2023-11-14 22:13:20.123");
        assert_eq!(
            format_timestamp(Timestamp::UNIX_EPOCH),
            "1970-01-01 00:00:00.000"
        );
    }

    #[test]
    fn formats_line_without_tags() {
        let record = Record::new(fixed(), Level::Info, "sas", "test", vec![]);
        let line = format(&LineLayout::default(), &record);
        insta::assert_snapshot!(line, @r#"2023-11-14 22:13:20.123 INFO sas "test""#);
    }

    #[test]
    fn formats_line_with_all_scopes() {
        let system = Tags::from([("system", "system")]);
        let app = Tags::from([("app", "app")]);
        let call = Tags::from([("per-call", "per-call")]);
        let pairs = resolve(&system, "SAS:", &app, Some(&call));

        let record = Record::new(fixed(), Level::Debug, "sas", "testing", pairs);
        let line = format(&LineLayout::default(), &record);
        insta::assert_snapshot!(
            line,
            @r#"2023-11-14 22:13:20.123 DEBUG sas "testing" system="system" SAS:.app="app" SAS:.per-call="per-call""#
        );
    }

    #[test]
    fn quotes_message_and_odd_names() {
        let record = Record::new(
            fixed(),
            Level::Error,
            "my service",
            "said \"no\"\nthen left",
            vec![],
        );
        let layout = LineLayout::default().timestamp_format(|_| "T".to_string());
        assert_eq!(
            format(&layout, &record),
            r#"T ERROR "my service" "said \"no\"\nthen left""#
        );
    }

    #[test]
    fn custom_timestamp_format() {
        let record = Record::new(fixed(), Level::Warn, "-", "", vec![]);
        let layout = LineLayout::default().timestamp_format(|ts| ts.as_millisecond().to_string());
        assert_eq!(format(&layout, &record), r#"1700000000123 WARN - """#);
    }
}
