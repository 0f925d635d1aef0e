//! Document-level options.
//!
//! A document may ask for an extra sized copy of every diagram block by
//! setting both `imgdir` and `imgsize` in its metadata:
//!
//! ```yaml
//! imgdir: static/thumbs
//! imgsize: 400x300
//! ```

use std::path::{Path, PathBuf};

use dgm_builder::SizeSpec;
use dgm_doc::{Meta, MetaValue};

use crate::size::parse_imgsize;

/// Metadata key naming the directory of the extra sized copy.
pub const IMGDIR_KEY: &str = "imgdir";
/// Metadata key holding the `<width>x<height>` size of the extra copy.
pub const IMGSIZE_KEY: &str = "imgsize";

/// Options read from document metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentOptions {
    pub imgdir: Option<PathBuf>,
    /// `None` when missing or malformed.
    pub imgsize: Option<SizeSpec>,
}

impl DocumentOptions {
    #[must_use]
    pub fn from_meta(meta: &Meta) -> Self {
        let text = |key: &str| {
            meta.get(key)
                .and_then(MetaValue::as_plain_text)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        Self {
            imgdir: text(IMGDIR_KEY).map(PathBuf::from),
            imgsize: text(IMGSIZE_KEY).as_deref().and_then(parse_imgsize),
        }
    }

    /// Directory and size of the extra copy, when both are configured.
    #[must_use]
    pub fn secondary(&self) -> Option<(&Path, SizeSpec)> {
        Some((self.imgdir.as_deref()?, self.imgsize?))
    }
}
