use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failure to move a document between disk and memory.
#[derive(Debug, Error, Diagnostic)]
pub enum ContentsError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(yaml_comments::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    #[diagnostic(code(yaml_comments::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
