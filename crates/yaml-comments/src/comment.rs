use core::fmt;

use crate::line::{Line, MARKER};
use crate::ypath::YamlPath;

/// Where a comment sits relative to the data it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Shares its line with data: `key: value # comment`.
    Inline,
    /// Occupies its own line and annotates the line below it.
    Full,
    /// An empty line, kept so that vertical spacing survives too.
    Blank,
}

impl CommentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Full => "full",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The row a comment is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// A data row (possibly carrying an inline comment itself), with its path.
    Line(Line),
    /// Another full-line or blank comment. Found again by its raw text,
    /// since comment lines have no path.
    Comment(Line),
    /// The comment is the last line of the document.
    EndOfDocument,
}

impl Context {
    pub fn path(&self) -> Option<&YamlPath> {
        match self {
            Self::Line(line) => line.path(),
            Self::Comment(_) | Self::EndOfDocument => None,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => match line.path() {
                Some(path) => write!(f, "{path}"),
                None => write!(f, "line {}", line.no()),
            },
            Self::Comment(line) => write!(f, "comment at line {}", line.no()),
            Self::EndOfDocument => f.write_str("end of document"),
        }
    }
}

/// A comment found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    line: Line,
    body: String,
    kind: CommentKind,
    context: Option<Context>,
}

impl Comment {
    pub(crate) fn new(line: Line, body: impl Into<String>, kind: CommentKind) -> Self {
        Self {
            line,
            body: body.into(),
            kind,
            context: None,
        }
    }

    /// The underlying line. For inline comments its key and value are those of
    /// the data in front of the marker.
    pub fn line(&self) -> &Line {
        &self.line
    }

    pub fn no(&self) -> usize {
        self.line.no()
    }

    pub fn raw(&self) -> &str {
        self.line.raw()
    }

    /// Everything after the marker, verbatim (leading space included).
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The comment text without surrounding whitespace.
    pub fn text(&self) -> &str {
        self.body.trim()
    }

    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    pub fn is_inline(&self) -> bool {
        self.kind == CommentKind::Inline
    }

    pub fn is_full(&self) -> bool {
        self.kind == CommentKind::Full
    }

    pub fn is_blank(&self) -> bool {
        self.kind == CommentKind::Blank
    }

    /// The anchor resolved at extraction time, `None` before extraction.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn context_path(&self) -> Option<&YamlPath> {
        self.context.as_ref().and_then(Context::path)
    }

    pub(crate) fn set_context(&mut self, context: Context) {
        self.context = Some(context);
    }

    /// Text appended to a data row to re-attach an inline comment.
    pub(crate) fn inline_suffix(&self) -> String {
        format!(" {MARKER}{}", self.body)
    }

    #[must_use]
    pub(crate) fn with_line_path(mut self, path: Option<YamlPath>) -> Self {
        self.line = self.line.with_path(path);
        self
    }

    pub(crate) fn into_line(self) -> Line {
        self.line
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
