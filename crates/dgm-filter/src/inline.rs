//! Inline-level pass.
//!
//! An inline code span carrying the diagram class is a complete expression:
//! it is rendered as-is with the document's definitions in scope.

use std::path::Path;

use dgm_builder::DiagramBuilder;
use dgm_doc::{Attr, Inline, Rewrite, Target};

use crate::render::{DiagramRenderer, RenderOutcome};
use crate::size::size_from_attrs;

pub(crate) struct InlineTransformer<'a, B> {
    pub(crate) renderer: &'a DiagramRenderer<B>,
    pub(crate) marker: &'a str,
    pub(crate) definitions: &'a [String],
}

impl<B: DiagramBuilder> Rewrite for InlineTransformer<'_, B> {
    fn inline(&mut self, inline: Inline) -> Inline {
        match inline {
            Inline::Code(attr, text) if attr.has_class(self.marker) => self.code(attr, text),
            other => other,
        }
    }
}

impl<B: DiagramBuilder> InlineTransformer<'_, B> {
    fn code(&self, attr: Attr, text: String) -> Inline {
        let size = size_from_attrs(&attr);
        match self
            .renderer
            .render(self.definitions, &text, false, size, None)
        {
            RenderOutcome::Success(path) => image_inline(&path),
            RenderOutcome::Failure(message) => Inline::Code(attr, format!("{text} {message}")),
        }
    }
}

/// Image reference with empty alt text and title.
pub(crate) fn image_inline(path: &Path) -> Inline {
    Inline::Image(
        Attr::default(),
        Vec::new(),
        Target::url(path.to_string_lossy()),
    )
}
