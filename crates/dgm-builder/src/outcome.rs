//! Build results.

use std::io;

/// Result of one build request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The source is not syntactically valid.
    ParseError(String),
    /// The source parsed but failed to evaluate, type-check or load.
    InterpError(String),
    /// An image for this content hash already exists; nothing was rendered.
    Skipped { hash: String },
    /// Freshly rendered image, PNG-encoded. The caller stores it.
    Built { hash: String, png: Vec<u8> },
}

impl BuildOutcome {
    /// Content hash of a successful build.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Skipped { hash } | Self::Built { hash, .. } => Some(hash),
            Self::ParseError(_) | Self::InterpError(_) => None,
        }
    }
}

/// The builder itself failed, independent of the diagram source.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The renderer program could not be started.
    #[error("failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// Communication with the renderer failed.
    #[error("renderer I/O error: {0}")]
    Io(#[from] io::Error),
    /// The request could not be encoded for the renderer.
    #[error("failed to encode build request: {0}")]
    Encode(#[from] serde_json::Error),
}
