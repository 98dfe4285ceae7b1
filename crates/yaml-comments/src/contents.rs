use alloc::collections::BTreeMap;
use core::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::CommentOptions;
use crate::comment::{Comment, Context};
use crate::error::ContentsError;
use crate::index;
use crate::line::Line;
use crate::row::Row;
use crate::ypath::YamlPath;

/// Comments extracted from a document, keyed by their original line number.
pub type Comments = BTreeMap<usize, Comment>;

/// Line terminator of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// `CrLf` when every line break of `text` is `\r\n`. Mixed documents are
    /// `Lf`, with their stray `\r` left inside the rows.
    pub fn detect(text: &str) -> Self {
        let breaks = text.matches('\n').count();
        if breaks > 0 && text.matches("\r\n").count() == breaks {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Outcome of [`Contents::inject_comments`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectReport {
    /// Number of comments written into the document.
    pub injected: usize,
    /// Original line numbers of the comments whose anchor was not found.
    pub dropped: Vec<usize>,
}

/// A document stored line by line, with the path of every data line.
///
/// The path index is rebuilt after every mutation, so it always matches the
/// current rows. Rows and comments handed out are copies; they do not follow
/// later changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contents {
    rows: Vec<String>,
    index: BTreeMap<usize, YamlPath>,
    trailing_newline: bool,
    line_ending: LineEnding,
    options: CommentOptions,
}

impl Contents {
    /// Load `text` with the default options.
    pub fn new(text: &str) -> Self {
        Self::with_options(text, CommentOptions::default())
    }

    pub fn with_options(text: &str, options: CommentOptions) -> Self {
        let line_ending = LineEnding::detect(text);
        let ending = line_ending.as_str();
        let (body, trailing_newline) = match text.strip_suffix(ending) {
            Some(body) => (body, true),
            None => (text, false),
        };
        let rows = if body.is_empty() {
            Vec::new()
        } else {
            body.split(ending).map(String::from).collect()
        };
        let mut contents = Self {
            rows: Vec::new(),
            index: BTreeMap::new(),
            trailing_newline,
            line_ending,
            options,
        };
        contents.swap_rows(rows);
        contents
    }

    /// Build from an explicit list of lines. The result has no trailing
    /// newline and uses `\n` line endings.
    pub fn from_lines<I, S>(lines: I, options: CommentOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut contents = Self {
            rows: Vec::new(),
            index: BTreeMap::new(),
            trailing_newline: false,
            line_ending: LineEnding::Lf,
            options,
        };
        contents.swap_rows(lines.into_iter().map(Into::into).collect());
        contents
    }

    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ContentsError::Read`] if the file cannot be read as UTF-8.
    pub fn load(path: &Path, options: CommentOptions) -> Result<Self, ContentsError> {
        let text = fs::read_to_string(path).map_err(|source| ContentsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_options(&text, options))
    }

    /// Write the document to disk.
    ///
    /// # Errors
    ///
    /// Returns [`ContentsError::Write`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ContentsError> {
        fs::write(path, self.to_string()).map_err(|source| ContentsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `line number => path` mapping of every data line.
    pub fn index(&self) -> &BTreeMap<usize, YamlPath> {
        &self.index
    }

    pub fn options(&self) -> CommentOptions {
        self.options
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Classify row `no`, with its path filled in when it has one.
    pub fn row(&self, no: usize) -> Option<Row> {
        let raw = self.rows.get(no)?;
        let path = self.index.get(&no).cloned();
        Some(match Row::classify(no, raw) {
            Row::Data(line) => Row::Data(line.with_path(path)),
            Row::Comment(comment) => Row::Comment(comment.with_line_path(path)),
        })
    }

    pub fn path_of(&self, no: usize) -> Option<&YamlPath> {
        self.index.get(&no)
    }

    /// First line whose path is `path`.
    pub fn line_no_by_path(&self, path: &YamlPath) -> Option<usize> {
        self.index
            .iter()
            .find_map(|(&no, candidate)| (candidate == path).then_some(no))
    }

    /// The data line at `path`, with its path set.
    pub fn line_by_path(&self, path: &YamlPath) -> Option<Line> {
        let no = self.line_no_by_path(path)?;
        self.row(no)?.into_addressable()
    }

    /// First row whose text is exactly `raw`. Comment lines have no path, so
    /// this is how they are found again.
    pub fn line_no_by_raw(&self, raw: &str) -> Option<usize> {
        self.rows.iter().position(|row| row == raw)
    }

    /// Extract every comment together with the row it is anchored to.
    ///
    /// Inline comments are anchored to their own line. Full-line and blank
    /// comments are anchored to the line right below them; the last line of
    /// the document is anchored to the end of the document.
    #[tracing::instrument(skip_all, fields(rows = self.rows.len()))]
    pub fn collect_comments(&self) -> Comments {
        let mut comments = Comments::new();
        for no in 0..self.rows.len() {
            let Some(Row::Comment(mut comment)) = self.row(no) else {
                continue;
            };
            let context = if comment.is_inline() {
                Context::Line(comment.line().clone())
            } else {
                self.context_below(no)
            };
            comment.set_context(context);
            comments.insert(no, comment);
        }
        debug!(count = comments.len(), "collected comments");
        comments
    }

    fn context_below(&self, no: usize) -> Context {
        match self.row(no + 1) {
            None => Context::EndOfDocument,
            Some(Row::Data(line)) => Context::Line(line),
            Some(Row::Comment(next)) if next.is_inline() => Context::Line(next.into_line()),
            Some(Row::Comment(next)) => Context::Comment(next.into_line()),
        }
    }

    /// Write `comments`, extracted from another version of this document,
    /// back into it.
    ///
    /// Inline comments go first, in ascending order: they only extend
    /// existing rows and never shift line numbers. Full-line and blank
    /// comments follow in descending order, each inserted right above its
    /// anchor, so that a block of consecutive comments comes back in its
    /// original order.
    ///
    /// A comment whose anchor does not exist here is dropped, and so is every
    /// comment anchored to a dropped one. This is not an error; the dropped
    /// line numbers are listed in the report.
    #[tracing::instrument(skip_all, fields(rows = self.rows.len(), comments = comments.len()))]
    pub fn inject_comments(&mut self, comments: Comments) -> InjectReport {
        let mut report = InjectReport::default();
        let (inline, others): (Vec<_>, Vec<_>) =
            comments.into_iter().partition(|(_, c)| c.is_inline());

        for (no, comment) in inline {
            let target = comment
                .context_path()
                .and_then(|path| self.line_no_by_path(path));
            let Some(target) = target else {
                debug!(
                    line = no,
                    context = ?comment.context_path().map(ToString::to_string),
                    "dropping inline comment, anchor not found"
                );
                report.dropped.push(no);
                continue;
            };
            let row = format!("{}{}", self.rows[target], comment.inline_suffix());
            self.replace_row(target, row);
            report.injected += 1;
        }

        // Where the previous comment went: the next one up may be anchored to it.
        let mut last_placed: Option<(usize, usize)> = None;
        for (no, comment) in others.into_iter().rev() {
            let Some(at) = self.insertion_point(&comment, last_placed, &report.dropped) else {
                debug!(line = no, kind = %comment.kind(), "dropping comment, anchor not found");
                report.dropped.push(no);
                last_placed = None;
                continue;
            };
            self.insert_row(at, comment.raw());
            last_placed = Some((no, at));
            report.injected += 1;
        }

        report.dropped.sort_unstable();
        debug!(
            injected = report.injected,
            dropped = report.dropped.len(),
            "injected comments"
        );
        report
    }

    fn insertion_point(
        &self,
        comment: &Comment,
        last_placed: Option<(usize, usize)>,
        dropped: &[usize],
    ) -> Option<usize> {
        match comment.context()? {
            Context::Line(line) => self.line_no_by_path(line.path()?),
            Context::Comment(line) if dropped.contains(&line.no()) => None,
            Context::Comment(line) => {
                // Identical comment lines (blank ones especially) are common:
                // prefer the copy placed for this very anchor.
                let placed = last_placed.and_then(|(no, at)| {
                    let same = no == line.no()
                        && self.rows.get(at).is_some_and(|row| row == line.raw());
                    same.then_some(at)
                });
                // Only reached when the anchor was not among the injected comments.
                placed.or_else(|| self.line_no_by_raw(line.raw()))
            }
            Context::EndOfDocument => Some(self.rows.len()),
        }
    }

    /// Insert `row` before line `no` (at the end when `no` is past it) and
    /// rebuild the index.
    pub fn insert_row(&mut self, no: usize, row: impl Into<String>) {
        let no = no.min(self.rows.len());
        let mut rows = core::mem::take(&mut self.rows);
        rows.insert(no, row.into());
        self.swap_rows(rows);
    }

    /// Replace line `no` and rebuild the index. Returns the previous text, or
    /// `None` (leaving the document untouched) when `no` is out of range.
    pub fn replace_row(&mut self, no: usize, row: impl Into<String>) -> Option<String> {
        let slot = self.rows.get_mut(no)?;
        let previous = core::mem::replace(slot, row.into());
        self.reindex();
        Some(previous)
    }

    fn swap_rows(&mut self, rows: Vec<String>) {
        self.rows = rows;
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = index::build(&self.rows, self.options.width());
        trace!(rows = self.rows.len(), indexed = self.index.len(), "rebuilt path index");
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ending = self.line_ending.as_str();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(ending)?;
            }
            f.write_str(row)?;
        }
        if self.trailing_newline {
            f.write_str(ending)?;
        }
        Ok(())
    }
}
