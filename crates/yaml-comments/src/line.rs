use alloc::borrow::Cow;

use crate::ypath::YamlPath;

/// Default number of columns per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// The comment marker.
pub const MARKER: char = '#';

/// Key given to sequence entries, which have no key of their own.
pub const SEQUENCE_KEY: &str = "[n]";

/// Stored form of [`MARKER`] inside keys and values.
const ESCAPED_MARKER: &str = "\\u0023";

/// Whether a line is a sequence entry (`- item`) or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Sequence,
    Regular,
}

/// A single physical line of a document, split into key and value.
///
/// Everything is derived from `raw` at construction. To change a line, build
/// a new one from the new raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    no: usize,
    raw: String,
    key: String,
    value: String,
    kind: LineKind,
    path: Option<YamlPath>,
}

impl Line {
    /// Parse `raw` as a data line, ignoring any comment it may carry.
    pub fn parse(no: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (kind, key, value) = split_data(&raw);
        let (key, value) = (escape(key), escape(value));
        Self::build(no, raw, kind, key, value)
    }

    /// A line whose key and value come from `data`, a fragment of `raw`
    /// (the part of an inline-commented line before the marker).
    pub(crate) fn with_data(no: usize, raw: impl Into<String>, data: &str) -> Self {
        let (kind, key, value) = split_data(data);
        Self::build(no, raw.into(), kind, escape(key), escape(value))
    }

    /// A line carrying no data at all (full-line and blank comments).
    pub(crate) fn bare(no: usize, raw: impl Into<String>) -> Self {
        Self::build(no, raw.into(), LineKind::Regular, String::new(), String::new())
    }

    /// `key` and `value` are already escaped.
    fn build(no: usize, raw: String, kind: LineKind, key: String, value: String) -> Self {
        Self {
            no,
            raw,
            key,
            value,
            kind,
            path: None,
        }
    }

    /// 0-based position of the line in its document.
    pub fn no(&self) -> usize {
        self.no
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn key(&self) -> Cow<'_, str> {
        unescape(&self.key)
    }

    pub fn value(&self) -> Cow<'_, str> {
        unescape(&self.value)
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == LineKind::Sequence
    }

    /// The address assigned by the document index, if any.
    pub fn path(&self) -> Option<&YamlPath> {
        self.path.as_ref()
    }

    #[must_use]
    pub(crate) fn with_path(mut self, path: Option<YamlPath>) -> Self {
        self.path = path;
        self
    }

    /// Indentation depth in levels of `width` columns.
    pub fn indent(&self, width: usize) -> usize {
        indent_depth(&self.raw, width)
    }
}

impl core::fmt::Display for Line {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Count the complete indentation levels in front of the first
/// non-whitespace character. Spaces count one column, tabs a whole level.
pub fn indent_depth(raw: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut columns = 0;
    for b in raw.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += width,
            _ => break,
        }
    }
    columns / width
}

/// Position of the first comment marker: a `#` at the start of the line or
/// right after a space or tab.
pub(crate) fn find_marker(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let delimits = b == b'#' && (i == 0 || matches!(bytes[i - 1], b' ' | b'\t'));
        delimits.then_some(i)
    })
}

/// Split a data fragment into kind, key and value.
fn split_data(data: &str) -> (LineKind, &str, &str) {
    let content = data.trim_start_matches([' ', '\t']);
    if let Some(item) = sequence_item(content) {
        return (LineKind::Sequence, SEQUENCE_KEY, item.trim());
    }
    if has_mapping_colon(data)
        && let Some((key, value)) = data.split_once(':')
    {
        return (
            LineKind::Regular,
            key.trim_matches([' ', '\t']),
            value.trim_matches([' ', '\t']),
        );
    }
    (LineKind::Regular, "", "")
}

/// The text after a leading `-` when it introduces a sequence entry.
fn sequence_item(content: &str) -> Option<&str> {
    let rest = content.strip_prefix('-')?;
    (rest.is_empty() || rest.starts_with([' ', '\t'])).then_some(rest)
}

/// A `:` followed by a space or the end of the line.
fn has_mapping_colon(data: &str) -> bool {
    data.match_indices(':')
        .any(|(i, _)| matches!(data.as_bytes().get(i + 1), None | Some(b' ')))
}

fn escape(s: &str) -> String {
    s.replace(MARKER, ESCAPED_MARKER)
}

fn unescape(s: &str) -> Cow<'_, str> {
    if s.contains(ESCAPED_MARKER) {
        Cow::Owned(s.replace(ESCAPED_MARKER, "#"))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_entry() {
        let line = Line::parse(3, "    name: demo");
        assert_eq!(line.no(), 3);
        assert_eq!(line.kind(), LineKind::Regular);
        assert_eq!(line.key(), "name");
        assert_eq!(line.value(), "demo");
        assert_eq!(line.indent(4), 1);
    }

    #[test]
    fn mapping_value_keeps_later_colons() {
        let line = Line::parse(0, "url: http://example.com:8080/a");
        assert_eq!(line.key(), "url");
        assert_eq!(line.value(), "http://example.com:8080/a");
    }

    #[test]
    fn mapping_key_without_value() {
        let line = Line::parse(0, "services:");
        assert_eq!(line.key(), "services");
        assert_eq!(line.value(), "");
    }

    #[test]
    fn colon_without_space_is_not_a_mapping() {
        let line = Line::parse(0, "http://example.com");
        assert_eq!(line.key(), "");
        assert_eq!(line.value(), "");
    }

    #[test]
    fn sequence_entry() {
        let line = Line::parse(0, "        - 443");
        assert!(line.is_sequence());
        assert_eq!(line.key(), SEQUENCE_KEY);
        assert_eq!(line.value(), "443");
        assert_eq!(line.indent(4), 2);
    }

    #[test]
    fn sequence_of_mappings_is_a_sequence_entry() {
        let line = Line::parse(0, "- name: web");
        assert!(line.is_sequence());
        assert_eq!(line.value(), "name: web");
    }

    #[test]
    fn bare_dash_is_a_sequence_entry() {
        let line = Line::parse(0, "    -");
        assert!(line.is_sequence());
        assert_eq!(line.value(), "");
    }

    #[test]
    fn hyphenated_word_is_not_a_sequence_entry() {
        let line = Line::parse(0, "-foo");
        assert_eq!(line.kind(), LineKind::Regular);
        assert_eq!(line.key(), "");
    }

    #[test]
    fn unparseable_line_is_kept() {
        let line = Line::parse(7, "just some text");
        assert_eq!(line.raw(), "just some text");
        assert_eq!(line.key(), "");
        assert_eq!(line.value(), "");
        assert_eq!(line.path(), None);
    }

    #[test]
    fn marker_in_value_is_escaped_internally() {
        let line = Line::parse(0, "note: \"a#b\"");
        assert_eq!(line.value, "\"a\\u0023b\"");
        assert_eq!(line.value(), "\"a#b\"");
    }

    #[test]
    fn marker_in_key_is_escaped_internally() {
        let line = Line::parse(0, "c#: language");
        assert_eq!(line.key, "c\\u0023");
        assert_eq!(line.key(), "c#");
    }

    #[test]
    fn indent_counts_complete_levels_only() {
        assert_eq!(indent_depth("key", 4), 0);
        assert_eq!(indent_depth("   key", 4), 0);
        assert_eq!(indent_depth("      key", 4), 1);
        assert_eq!(indent_depth("        key", 4), 2);
        assert_eq!(indent_depth("\tkey", 4), 1);
        assert_eq!(indent_depth("  key", 2), 1);
    }

    #[test]
    fn indent_of_whitespace_only_line() {
        assert_eq!(indent_depth("        ", 4), 2);
        assert_eq!(indent_depth("", 4), 0);
    }

    #[test]
    fn marker_positions() {
        assert_eq!(find_marker("# top"), Some(0));
        assert_eq!(find_marker("    # nested"), Some(4));
        assert_eq!(find_marker("key: v # c"), Some(7));
        assert_eq!(find_marker("key: v\t# c"), Some(7));
        assert_eq!(find_marker("note: \"a#b\""), None);
        assert_eq!(find_marker("a#b # c"), Some(4));
    }

    #[test]
    fn parse_owns_its_fields() {
        let raw = String::from("    port: 8080 # http");
        let line = Line::parse(2, raw);
        assert_eq!(line.raw(), "    port: 8080 # http");
        assert_eq!(line.key(), "port");
        assert_eq!(line.value, "8080 \\u0023 http");
        assert_eq!(line.value(), "8080 # http");
    }

    #[test]
    fn display_is_raw_text() {
        let line = Line::parse(0, "  - x");
        assert_eq!(line.to_string(), "  - x");
    }
}
