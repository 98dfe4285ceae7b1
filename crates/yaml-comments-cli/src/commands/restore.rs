use miette::Result;
use yaml_comments::{Contents, ContentsError, InjectReport};

use crate::RestoreArgs;

/// The target document with the comments put back.
#[derive(Debug)]
pub struct Restored {
    pub output: String,
    pub report: InjectReport,
}

/// Restore the comments of `args.from` into `args.target`, rewriting the
/// target when `args.write` is set.
///
/// # Errors
///
/// Returns an error if either file cannot be read, or the target cannot be
/// written back.
#[tracing::instrument(
    skip_all,
    name = "restore",
    fields(from = %args.from.display(), target = %args.target.display())
)]
pub fn restore(args: &RestoreArgs) -> Result<Restored, ContentsError> {
    let options = args.indent.options();
    let source = Contents::load(&args.from, options)?;
    let mut target = Contents::load(&args.target, options)?;

    let report = target.inject_comments(source.collect_comments());
    if args.write {
        target.save(&args.target)?;
    }
    Ok(Restored {
        output: target.to_string(),
        report,
    })
}

/// Run the `restore` command: print the restored document, or rewrite the
/// target with `--write`.
pub fn run(args: &RestoreArgs) -> Result<()> {
    let Restored { output, report } = restore(args)?;
    if !args.write {
        print!("{output}");
    }
    if args.verbose {
        for no in &report.dropped {
            eprintln!("  dropped comment from line {}", no + 1);
        }
        eprintln!(
            "Restored {} comments, dropped {}.",
            report.injected,
            report.dropped.len()
        );
    }
    Ok(())
}
