//! Diagram filter for dgm.
//!
//! Scans a parsed document for tagged code and replaces it with rendered
//! images:
//! - Definition blocks (class `diagram-def`) are collected once per document
//!   and removed from the output
//! - Diagram blocks (class `diagram`) are evaluated with their own body and
//!   all definitions in scope, and become a paragraph holding the image
//! - Diagram inline spans are evaluated as complete expressions and become
//!   inline images
//!
//! A block can also be tagged by a first line of the form `{.diagram}`.
//! Render failures never abort the document: the failing node keeps its
//! source with the error appended, and the error is reported once to a
//! [`DiagnosticSink`].
//!
//! # Architecture
//!
//! - [`tags`]: marker-line extraction and effective tag sets
//! - [`definitions`]: definition collection
//! - [`render`]: [`DiagramRenderer`], the single gateway to the builder
//! - [`filter`]: [`DiagramFilter`], running the block and inline passes
//!
//! # Example
//!
//! ```no_run
//! use dgm_builder::ProcessBuilder;
//! use dgm_config::FilterConfig;
//! use dgm_doc::{Attr, Block, Pandoc};
//! use dgm_filter::DiagramFilter;
//!
//! let config = FilterConfig::default();
//! let filter = DiagramFilter::new(ProcessBuilder::new("dgm-render"), &config);
//!
//! let doc = Pandoc::new(vec![
//!     Block::CodeBlock(Attr::with_classes(["diagram-def"]), "gSq = square 1".to_owned()),
//!     Block::CodeBlock(Attr::with_classes(["diagram"]), "dia = gSq".to_owned()),
//! ]);
//! let doc = filter.apply(doc);
//! ```

mod block;
pub mod definitions;
mod diagnostics;
mod error;
pub mod filter;
mod inline;
mod options;
pub mod render;
mod size;
pub mod tags;

#[cfg(test)]
mod testing;

pub use definitions::collect_definitions;
pub use diagnostics::{DiagnosticSink, StderrSink};
pub use error::FilterError;
pub use filter::DiagramFilter;
pub use options::{DocumentOptions, IMGDIR_KEY, IMGSIZE_KEY};
pub use render::{DiagramRenderer, RenderOutcome};
pub use size::{parse_imgsize, size_from_attrs};
pub use tags::{CodeTags, MarkedBody, Markers, split_marker_line};

pub use dgm_builder::{DEFAULT_PAD_FACTOR, SizeSpec};
