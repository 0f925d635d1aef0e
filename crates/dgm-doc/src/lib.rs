//! Document tree for dgm.
//!
//! This crate models an already-parsed document the way pandoc's JSON AST does:
//! - [`Block`] and [`Inline`] are closed enums, one per tree level
//! - [`Attr`] carries the identifier, class list and key-value attributes of a node
//! - [`Pandoc`] pairs document metadata with the block list
//!
//! Two traversal helpers are provided:
//! - [`Rewrite`] / [`Pandoc::rewrite`]: bottom-up rebuild of the tree
//! - [`visit_blocks`]: pre-order, read-only query over blocks
//!
//! # Example
//!
//! ```
//! use dgm_doc::{Attr, Block, Pandoc, Rewrite};
//!
//! struct DropCode;
//!
//! impl Rewrite for DropCode {
//!     fn block(&mut self, block: Block) -> Option<Block> {
//!         match block {
//!             Block::CodeBlock(..) => None,
//!             other => Some(other),
//!         }
//!     }
//! }
//!
//! let doc = Pandoc::new(vec![
//!     Block::CodeBlock(Attr::default(), "x".to_owned()),
//!     Block::HorizontalRule,
//! ]);
//! let doc = doc.rewrite(&mut DropCode);
//! assert_eq!(doc.blocks, vec![Block::HorizontalRule]);
//! ```

mod ast;
mod json;
mod walk;

pub use ast::{
    Alignment, Attr, Block, Caption, Cell, Citation, CitationMode, ColSpec, ColWidth, Inline,
    ListAttributes, ListNumberDelim, ListNumberStyle, MathType, Meta, MetaValue, Pandoc,
    QuoteType, Row, TableBody, TableFoot, TableHead, Target,
};
pub use json::DocError;
pub use walk::{Rewrite, visit_blocks};
