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

//! The quoting rule shared by messages, names and tag values.
//!
//! A quoted field is wrapped in `"` with `"` and `\` escaped by a backslash, and control
//! characters escaped, so a line can be split on whitespace outside of quotes.

use std::fmt;
use std::fmt::Write;

/// Writes `s` wrapped in double quotes.
pub(crate) fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c.is_control() => write!(out, "\\u{{{:x}}}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// Writes `s` bare if it is a single safe token, quoted otherwise.
pub(crate) fn write_maybe_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    if s.is_empty() || s.chars().any(is_separator) {
        write_quoted(out, s)
    } else {
        out.write_str(s)
    }
}

/// Writes a tag key, replacing characters that would split the `key=value` token.
pub(crate) fn write_key<W: Write>(out: &mut W, key: &str) -> fmt::Result {
    for c in key.chars() {
        out.write_char(if is_separator(c) { '_' } else { c })?;
    }
    Ok(())
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_control() || c == '"' || c == '='
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> String {
        let mut out = String::new();
        write_quoted(&mut out, s).unwrap();
        out
    }

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quoted("test"), r#""test""#);
        assert_eq!(quoted(""), r#""""#);
        assert_eq!(quoted(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quoted(r"C:\tmp"), r#""C:\\tmp""#);
        assert_eq!(quoted("a\nb\tc\r"), r#""a\nb\tc\r""#);
        assert_eq!(quoted("bell\u{7}"), r#""bell\u{7}""#);
        assert_eq!(quoted("héllo wörld"), r#""héllo wörld""#);
    }

    #[test]
    fn names_are_quoted_only_when_needed() {
        let maybe = |s: &str| {
            let mut out = String::new();
            write_maybe_quoted(&mut out, s).unwrap();
            out
        };

        assert_eq!(maybe("sas"), "sas");
        assert_eq!(maybe("-"), "-");
        assert_eq!(maybe("SAS:"), "SAS:");
        assert_eq!(maybe(""), r#""""#);
        assert_eq!(maybe("my service"), r#""my service""#);
        assert_eq!(maybe("a=b"), r#""a=b""#);
    }

    #[test]
    fn keys_never_split_tokens() {
        let key = |s: &str| {
            let mut out = String::new();
            write_key(&mut out, s).unwrap();
            out
        };

        assert_eq!(key("request_id"), "request_id");
        assert_eq!(key("per-call"), "per-call");
        assert_eq!(key("a b=c\"d\n"), "a_b_c_d_");
    }
}
