//! Pandoc JSON (de)serialization.

use crate::Pandoc;

/// Error reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The input is not a valid pandoc JSON document.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Pandoc {
    /// Parse a document from pandoc's JSON AST.
    pub fn from_json(input: &str) -> Result<Self, DocError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize the document to pandoc's JSON AST.
    pub fn to_json(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string(self)?)
    }
}
