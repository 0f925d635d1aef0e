//! Diagram build contract for dgm.
//!
//! Compiling a diagram expression, rendering it and caching the image are the
//! job of a [`DiagramBuilder`]. This crate defines that contract:
//! - [`BuildRequest`]: declarations, imports, expression, size, post-processing
//! - [`BuildOutcome`]: parse failure, interpretation failure, cache hit or fresh image
//! - [`BuildKey`]: content hash over every input that affects the image
//!
//! [`ProcessBuilder`] implements the contract by handing the request to an
//! external renderer program, skipping the call when an image for the same
//! content hash already exists in the output directory.
//!
//! # Example
//!
//! ```no_run
//! use dgm_builder::{BuildOutcome, BuildRequest, DiagramBuilder, ProcessBuilder};
//!
//! let builder = ProcessBuilder::new("dgm-render");
//! let request = BuildRequest::new("circle 1", "diagrams");
//! match builder.build(&request) {
//!     Ok(BuildOutcome::Built { hash, .. } | BuildOutcome::Skipped { hash }) => {
//!         println!("image hash {hash}");
//!     }
//!     Ok(other) => println!("failed: {other:?}"),
//!     Err(e) => println!("builder unavailable: {e}"),
//! }
//! ```

mod key;
mod outcome;
mod process;
mod request;

pub use key::BuildKey;
pub use outcome::{BuildError, BuildOutcome};
pub use process::{EXIT_PARSE_ERROR, ProcessBuilder};
pub use request::{BuildRequest, DEFAULT_PAD_FACTOR, PostProcess, SizeSpec};

use std::path::{Path, PathBuf};

/// File extension of rendered images.
pub const IMAGE_EXTENSION: &str = "png";

/// Compiles, renders and caches diagram expressions.
pub trait DiagramBuilder {
    /// Build the image described by `request`.
    ///
    /// User-facing failures (bad syntax, failed evaluation) are reported as
    /// [`BuildOutcome`] variants. `Err` is reserved for the builder itself being
    /// unusable, e.g. a renderer process that cannot be started.
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError>;
}

impl<B: DiagramBuilder + ?Sized> DiagramBuilder for &B {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        (**self).build(request)
    }
}

impl<B: DiagramBuilder + ?Sized> DiagramBuilder for Box<B> {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        (**self).build(request)
    }
}

/// Path of the image for `hash` inside `dir`.
#[must_use]
pub fn image_path(dir: &Path, hash: &str) -> PathBuf {
    dir.join(format!("{hash}.{IMAGE_EXTENSION}"))
}
