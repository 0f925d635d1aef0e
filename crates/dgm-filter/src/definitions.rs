//! Definition collection.

use dgm_doc::{Block, visit_blocks};

use crate::tags::CodeTags;

/// Bodies of every definition block in `blocks`, in document order.
///
/// A block counts as a definition when its effective tag set contains
/// `marker`. The marker line, if present, is not part of the collected body.
/// Inline code is never a definition.
#[must_use]
pub fn collect_definitions(blocks: &[Block], marker: &str) -> Vec<String> {
    let mut definitions = Vec::new();
    visit_blocks(blocks, &mut |block| {
        if let Block::CodeBlock(attr, text) = block {
            let tags = CodeTags::new(attr, text);
            if tags.has(marker) {
                definitions.push(tags.body.to_owned());
            }
        }
    });
    definitions
}
