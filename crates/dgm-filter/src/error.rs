//! Error types.

use std::io;
use std::path::PathBuf;

use dgm_doc::DocError;

/// Error of a whole-document operation.
///
/// Render failures never surface here; they are recorded in the document.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("{0}")]
    Document(#[from] DocError),
}

/// Failure to store a rendered image.
#[derive(Debug, thiserror::Error)]
pub(crate) enum OutputError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot write image {}: {source}", .path.display())]
    WriteImage { path: PathBuf, source: io::Error },
}
