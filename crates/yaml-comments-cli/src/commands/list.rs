use core::fmt::Write as _;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use yaml_comments::{Comment, Contents, Context};

use crate::ListArgs;

/// One comment as shown by `list`. Line numbers are 1-based.
#[derive(Debug, Serialize)]
struct Entry<'a> {
    line: usize,
    kind: &'static str,
    context: String,
    text: &'a str,
}

impl<'a> From<&'a Comment> for Entry<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            line: comment.no() + 1,
            kind: comment.kind().as_str(),
            context: comment.context().map(describe).unwrap_or_default(),
            text: comment.text(),
        }
    }
}

fn describe(context: &Context) -> String {
    match context {
        Context::Line(line) => line
            .path()
            .map_or_else(|| format!("line {}", line.no() + 1), ToString::to_string),
        Context::Comment(line) => format!("comment at line {}", line.no() + 1),
        Context::EndOfDocument => "end of document".to_string(),
    }
}

/// Render the comments of `contents`, as text or as a JSON array.
pub fn render(contents: &Contents, json: bool) -> Result<String> {
    let comments = contents.collect_comments();
    let entries: Vec<Entry<'_>> = comments.values().map(Entry::from).collect();

    if json {
        let mut out = serde_json::to_string_pretty(&entries).into_diagnostic()?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for entry in &entries {
        let row = format!(
            "{:<4}{:<8}{:<24}  {}",
            entry.line, entry.kind, entry.context, entry.text
        );
        writeln!(out, "{}", row.trim_end()).into_diagnostic()?;
    }
    Ok(out)
}

/// Run the `list` command: print the comments of a file to stdout.
pub fn run(args: &ListArgs) -> Result<()> {
    let contents = Contents::load(&args.file, args.indent.options())?;
    print!("{}", render(&contents, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "\
# Service definitions
services:
    web:
        image: nginx # pinned below

        ports:
            - 80
            - 443 # tls
# end
";

    #[test]
    fn render_text() -> Result<()> {
        let out = render(&Contents::new(DOCUMENT), false)?;
        insta::assert_snapshot!(out, @r"
        1   full    services                  Service definitions
        4   inline  services.web.image        pinned below
        5   blank   services.web.ports
        8   inline  services.web.ports.1      tls
        9   full    end of document           end
        ");
        Ok(())
    }

    #[test]
    fn render_json() -> Result<()> {
        let out = render(&Contents::new("a: 1 # one\n# tail\n"), true)?;
        insta::assert_snapshot!(out, @r#"
        [
          {
            "line": 1,
            "kind": "inline",
            "context": "a",
            "text": "one"
          },
          {
            "line": 2,
            "kind": "full",
            "context": "end of document",
            "text": "tail"
          }
        ]
        "#);
        Ok(())
    }

    #[test]
    fn render_without_comments() -> Result<()> {
        assert_eq!(render(&Contents::new("a: 1\n"), false)?, "");
        assert_eq!(render(&Contents::new("a: 1\n"), true)?, "[]\n");
        Ok(())
    }

    #[test]
    fn comment_context_is_one_based() {
        let comments = Contents::new("# a\n# b\nkey: v\n").collect_comments();
        let entry = Entry::from(&comments[&0]);
        assert_eq!(entry.context, "comment at line 2");
    }
}
