use crate::comment::{Comment, CommentKind};
use crate::line::{Line, find_marker};
use crate::ypath::YamlPath;

/// A classified line: plain data or a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Data(Line),
    Comment(Comment),
}

impl Row {
    /// Classify one raw line.
    ///
    /// Whitespace-only lines are blank comments. A line containing a comment
    /// marker (`#` at the start of the line or after a space or tab) is a
    /// full-line comment when nothing but whitespace precedes the marker, and
    /// an inline comment otherwise. Everything else is data.
    ///
    /// Quotes are not tracked: `key: "a #b"` reads as `key: "a` followed by
    /// the comment `b"`.
    pub fn classify(no: usize, raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Comment(Comment::new(Line::bare(no, raw), "", CommentKind::Blank));
        }

        let Some(pos) = find_marker(raw) else {
            return Self::Data(Line::parse(no, raw));
        };

        // Only the first marker delimits; `### title` keeps `## title`.
        let data = raw[..pos].trim();
        let body = &raw[pos + 1..];
        if data.is_empty() {
            Self::Comment(Comment::new(Line::bare(no, raw), body, CommentKind::Full))
        } else {
            Self::Comment(Comment::new(
                Line::with_data(no, raw, data),
                body,
                CommentKind::Inline,
            ))
        }
    }

    /// The underlying line.
    pub fn line(&self) -> &Line {
        match self {
            Self::Data(line) => line,
            Self::Comment(comment) => comment.line(),
        }
    }

    pub fn no(&self) -> usize {
        self.line().no()
    }

    pub fn raw(&self) -> &str {
        self.line().raw()
    }

    pub fn path(&self) -> Option<&YamlPath> {
        self.line().path()
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(comment) => Some(comment),
            Self::Data(_) => None,
        }
    }

    /// Whether the row carries data and therefore gets a path: data rows and
    /// inline-commented rows.
    pub fn is_addressable(&self) -> bool {
        match self {
            Self::Data(_) => true,
            Self::Comment(comment) => comment.is_inline(),
        }
    }

    /// The data line of an addressable row.
    pub(crate) fn into_addressable(self) -> Option<Line> {
        match self {
            Self::Data(line) => Some(line),
            Self::Comment(comment) if comment.is_inline() => Some(comment.into_line()),
            Self::Comment(_) => None,
        }
    }
}
