//! Block-level pass.
//!
//! Definition blocks are removed from their parent's block list. Diagram blocks become a
//! paragraph holding the rendered image, or stay a code block with the error
//! appended when rendering fails.

use std::path::Path;

use dgm_builder::{DiagramBuilder, SizeSpec};
use dgm_doc::{Attr, Block, Rewrite};

use crate::inline::image_inline;
use crate::render::{DiagramRenderer, RenderOutcome};
use crate::size::size_from_attrs;
use crate::tags::{CodeTags, Markers};

pub(crate) struct BlockTransformer<'a, B> {
    pub(crate) renderer: &'a DiagramRenderer<B>,
    pub(crate) markers: &'a Markers,
    /// Identifier evaluated for every diagram block.
    pub(crate) expression: &'a str,
    /// Definitions collected before the pass started.
    pub(crate) definitions: &'a [String],
    /// Extra sized copy requested by the document.
    pub(crate) secondary: Option<(&'a Path, SizeSpec)>,
}

impl<B: DiagramBuilder> Rewrite for BlockTransformer<'_, B> {
    fn block(&mut self, block: Block) -> Option<Block> {
        match block {
            Block::CodeBlock(attr, text) => self.code_block(attr, text),
            other => Some(other),
        }
    }
}

impl<B: DiagramBuilder> BlockTransformer<'_, B> {
    fn code_block(&self, attr: Attr, text: String) -> Option<Block> {
        let tags = CodeTags::new(&attr, &text);

        if tags.has(&self.markers.definition) {
            return None;
        }
        if !tags.has(&self.markers.diagram) {
            return Some(Block::CodeBlock(attr, text));
        }

        // The block's own body comes first, ahead of the shared definitions.
        let mut declarations = Vec::with_capacity(self.definitions.len() + 1);
        declarations.push(tags.body.to_owned());
        declarations.extend_from_slice(self.definitions);

        let size = size_from_attrs(&attr);
        let block = match self
            .renderer
            .render(&declarations, self.expression, true, size, None)
        {
            RenderOutcome::Success(path) => {
                if let Some((dir, size)) = self.secondary {
                    let _ = self
                        .renderer
                        .render(&declarations, self.expression, true, size, Some(dir));
                }
                Block::Para(vec![image_inline(&path)])
            }
            RenderOutcome::Failure(message) => Block::CodeBlock(attr, format!("{text}\n{message}")),
        };
        Some(block)
    }
}
