#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives
extern crate alloc;

mod comment;
mod contents;
mod error;
mod index;
mod line;
mod row;
mod ypath;

pub use comment::{Comment, CommentKind, Context};
pub use contents::{Comments, Contents, InjectReport, LineEnding};
pub use error::ContentsError;
pub use line::{DEFAULT_INDENT_WIDTH, Line, LineKind, MARKER, SEQUENCE_KEY, indent_depth};
pub use row::Row;
pub use ypath::{SEPARATOR, Segment, YamlPath};

/// Options controlling how lines are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentOptions {
    /// Number of columns making up one indentation level. A tab always counts
    /// as one full level. Zero is treated as one.
    pub indent_width: usize,
}

impl Default for CommentOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl CommentOptions {
    pub(crate) fn width(self) -> usize {
        self.indent_width.max(1)
    }
}

/// Restore the comments of `source` into `target`.
///
/// `target` is expected to hold the same data as `source` with its comments
/// stripped, typically the output of a parse/serialize round-trip. Comments
/// whose anchor cannot be found in `target` are dropped. The result keeps the
/// line ending and trailing newline of `target`.
pub fn restore_comments(source: &str, target: &str, options: CommentOptions) -> String {
    let comments = Contents::with_options(source, options).collect_comments();
    let mut restored = Contents::with_options(target, options);
    restored.inject_comments(comments);
    restored.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn restore_full_document() {
        let source = "\
# Deployment settings
app:
    name: demo # display name

    # Exposed ports
    ports:
        - 80
        - 443 # tls
";
        let target = "app:\n    name: demo\n    ports:\n        - 80\n        - 443\n";
        let restored = restore_comments(source, target, CommentOptions::default());
        assert_eq!(restored, source);
    }

    #[test]
    fn restore_with_two_space_indentation() {
        let source = "a:\n  # inner\n  b: 1\n";
        let target = "a:\n  b: 1\n";
        let options = CommentOptions { indent_width: 2 };
        assert_eq!(restore_comments(source, target, options), source);
    }

    #[test]
    fn restore_keeps_target_trailing_newline() {
        let restored = restore_comments("# top\nkey: v\n", "key: v", CommentOptions::default());
        assert_eq!(restored, "# top\nkey: v");
    }

    #[test]
    fn zero_indent_width_is_clamped() {
        let options = CommentOptions { indent_width: 0 };
        assert_eq!(options.width(), 1);
    }
}
