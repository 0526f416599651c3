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

//! Key-value tags and the rules for merging and rendering them.
//!
//! A logger carries tags at three scopes:
//!
//! * system tags describe the process or service and are rendered bare, as `key="value"`;
//! * app tags describe the owning subsystem and are rendered under the logger's prefix, as
//!   `prefix.key="value"`;
//! * per-call tags describe a single event and are rendered like app tags.
//!
//! Tags are kept sorted by key, so the rendered output is deterministic.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::btree_map;
use std::fmt;

use crate::quote::write_key;
use crate::quote::write_quoted;

/// An ordered set of string key-value tags.
///
/// # Examples
///
/// ```
/// use logtag::Tags;
///
/// let tags = Tags::from([("request_id", "1234"), ("region", "eu")]);
/// assert_eq!(tags.get("request_id"), Some("1234"));
///
/// let keys = tags.keys().collect::<Vec<_>>();
/// assert_eq!(keys, ["region", "request_id"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Create an empty set of tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning the updated tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Tags;
    ///
    /// let tags = Tags::new().with("app", "billing").with("version", "2");
    /// assert_eq!(tags.len(), 2);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a tag, returning the previous value of the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the value of a tag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a tag with the given key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the keys, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over the tags, in lexicographic order of keys.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.iter())
    }

    /// Derive a new set of tags from this one.
    ///
    /// The result starts as a full copy of `self`. Each tag in `overrides` is added only if its
    /// key is absent, so existing tags always win. `self` is left untouched and the result owns
    /// its own storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Tags;
    ///
    /// let parent = Tags::from([("orig_key", "orig_value")]);
    /// let child = parent.derive(&Tags::from([("orig_key", "new_value"), ("extra", "extra")]));
    ///
    /// assert_eq!(child.get("orig_key"), Some("orig_value"));
    /// assert_eq!(child.get("extra"), Some("extra"));
    /// assert_eq!(parent.len(), 1);
    /// ```
    pub fn derive(&self, overrides: &Tags) -> Tags {
        let mut merged = self.clone();
        for (key, value) in overrides.0.iter() {
            if !merged.0.contains_key(key) {
                merged.0.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Render the tags as `key="value"` pairs.
    ///
    /// If `scope` is non-empty, each key is rendered as `scope.key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtag::Tags;
    ///
    /// let tags = Tags::from([("app", "app")]);
    ///
    /// let bare = tags.render("").map(|p| p.to_string()).collect::<Vec<_>>();
    /// assert_eq!(bare, [r#"app="app""#]);
    ///
    /// let scoped = tags.render("SAS:").map(|p| p.to_string()).collect::<Vec<_>>();
    /// assert_eq!(scoped, [r#"SAS:.app="app""#]);
    /// ```
    pub fn render<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = Pair<'a>> + 'a {
        self.iter().map(move |(key, value)| Pair { scope, key, value })
    }
}

/// Resolve the three tag scopes of a line into one ordered sequence of pairs.
///
/// System tags come first and are rendered bare, then app tags and per-call tags, both under
/// `scope`. A rendered key is emitted at most once, and its first occurrence wins. With an
/// empty scope this means a system tag hides an app or per-call tag of the same key.
pub fn resolve<'a>(
    system: &'a Tags,
    scope: &'a str,
    app: &'a Tags,
    call: Option<&'a Tags>,
) -> Vec<Pair<'a>> {
    let mut pairs = Vec::with_capacity(system.len() + app.len() + call.map_or(0, Tags::len));
    let mut seen = BTreeSet::new();

    let scoped = app.render(scope).chain(call.into_iter().flat_map(|c| c.render(scope)));
    for pair in system.render("").chain(scoped) {
        if seen.insert(pair.rendered_key()) {
            pairs.push(pair);
        }
    }

    pairs
}

/// A tag rendered under a scope.
///
/// Formats as `scope.key="value"`, or `key="value"` when the scope is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair<'a> {
    scope: &'a str,
    key: &'a str,
    value: &'a str,
}

impl<'a> Pair<'a> {
    /// The scope the tag is rendered under; empty for bare keys.
    pub fn scope(&self) -> &'a str {
        self.scope
    }

    /// The key of the tag, without scope.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The unquoted value of the tag.
    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The key as written to the line, including the scope.
    pub fn rendered_key(&self) -> String {
        let mut out = String::with_capacity(self.scope.len() + self.key.len() + 1);
        // SAFETY: write to a string always succeeds
        self.write_key(&mut out).unwrap();
        out
    }

    fn write_key<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        if !self.scope.is_empty() {
            write_key(out, self.scope)?;
            out.write_char('.')?;
        }
        write_key(out, self.key)
    }
}

impl fmt::Display for Pair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_key(f)?;
        f.write_str("=")?;
        write_quoted(f, self.value)
    }
}

/// An iterator over the tags of a [`Tags`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        tags.extend(iter);
        tags
    }
}

impl<K, V> Extend<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Tags(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[Pair]) -> Vec<String> {
        pairs.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn derive_keeps_parent_values() {
        let parent = Tags::from([("orig_key", "orig_value")]);
        let overrides = Tags::from([("orig_key", "new_value"), ("extra", "extra")]);

        let child = parent.derive(&overrides);
        assert_eq!(child.len(), 2);
        assert_eq!(child.get("orig_key"), Some("orig_value"));
        assert_eq!(child.get("extra"), Some("extra"));

        assert_eq!(parent, Tags::from([("orig_key", "orig_value")]));
    }

    #[test]
    fn derived_tags_do_not_alias_parent() {
        let parent = Tags::from([("a", "1")]);
        let mut child = parent.derive(&Tags::new());
        child.insert("b", "2");
        child.insert("a", "changed");

        assert_eq!(parent.len(), 1);
        assert_eq!(parent.get("a"), Some("1"));
        assert!(!parent.contains_key("b"));
    }

    #[test]
    fn render_is_sorted_by_key() {
        let tags = Tags::from([("zeta", "z"), ("alpha", "a"), ("mid", "m")]);
        let rendered = tags.render("").map(|p| p.to_string()).collect::<Vec<_>>();
        assert_eq!(rendered, [r#"alpha="a""#, r#"mid="m""#, r#"zeta="z""#]);
    }

    #[test]
    fn render_quotes_values() {
        let tags = Tags::from([("path", r#"C:\a "b""#)]);
        let rendered = tags.render("svc").map(|p| p.to_string()).collect::<Vec<_>>();
        assert_eq!(rendered, [r#"svc.path="C:\\a \"b\"""#]);
    }

    #[test]
    fn resolve_orders_scopes() {
        let system = Tags::from([("system", "system")]);
        let app = Tags::from([("app", "app")]);
        let call = Tags::from([("per-call", "per-call")]);

        let pairs = resolve(&system, "SAS:", &app, Some(&call));
        assert_eq!(
            tokens(&pairs),
            [
                r#"system="system""#,
                r#"SAS:.app="app""#,
                r#"SAS:.per-call="per-call""#,
            ]
        );
    }

    #[test]
    fn resolve_emits_each_key_once() {
        let system = Tags::from([("k", "system")]);
        let app = Tags::from([("k", "app"), ("a", "app")]);
        let call = Tags::from([("k", "call"), ("a", "call"), ("c", "call")]);

        let scoped = resolve(&system, "p", &app, Some(&call));
        assert_eq!(
            tokens(&scoped),
            [r#"k="system""#, r#"p.a="app""#, r#"p.k="app""#, r#"p.c="call""#]
        );

        let bare = resolve(&system, "", &app, Some(&call));
        assert_eq!(tokens(&bare), [r#"k="system""#, r#"a="app""#, r#"c="call""#]);
    }

    #[test]
    fn resolve_without_tags_is_empty() {
        let empty = Tags::new();
        assert!(resolve(&empty, "SAS:", &empty, None).is_empty());
    }
}
