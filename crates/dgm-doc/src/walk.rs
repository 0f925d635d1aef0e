//! Tree traversal.
//!
//! [`Rewrite`] rebuilds a document bottom-up: every child is rewritten before
//! its parent is handed to the hook. [`visit_blocks`] is the read-only
//! counterpart used for queries, visiting blocks in document order (parent
//! before children).

use crate::{Block, Caption, Citation, Inline, Pandoc, Row, TableBody, TableFoot, TableHead};

/// Per-node rewrite hooks.
///
/// Both hooks default to the identity, so an implementation only overrides
/// the level it cares about.
pub trait Rewrite {
    /// Replace a block whose children have already been rewritten.
    ///
    /// Returning `None` removes the block from its parent's block list.
    fn block(&mut self, block: Block) -> Option<Block> {
        Some(block)
    }

    /// Replace an inline whose children have already been rewritten.
    fn inline(&mut self, inline: Inline) -> Inline {
        inline
    }
}

impl Pandoc {
    /// Rewrite every block and inline of the document body, bottom-up.
    ///
    /// Metadata is left untouched.
    #[must_use]
    pub fn rewrite<R: Rewrite + ?Sized>(self, rewriter: &mut R) -> Self {
        Self {
            blocks: rewrite_blocks(self.blocks, rewriter),
            ..self
        }
    }
}

fn rewrite_blocks<R: Rewrite + ?Sized>(blocks: Vec<Block>, rw: &mut R) -> Vec<Block> {
    blocks
        .into_iter()
        .filter_map(|block| rewrite_block(block, rw))
        .collect()
}

fn rewrite_items<R: Rewrite + ?Sized>(items: Vec<Vec<Block>>, rw: &mut R) -> Vec<Vec<Block>> {
    items
        .into_iter()
        .map(|item| rewrite_blocks(item, rw))
        .collect()
}

fn rewrite_caption<R: Rewrite + ?Sized>(Caption(short, blocks): Caption, rw: &mut R) -> Caption {
    let short = short.map(|inlines| rewrite_inlines(inlines, rw));
    Caption(short, rewrite_blocks(blocks, rw))
}

fn rewrite_rows<R: Rewrite + ?Sized>(rows: Vec<Row>, rw: &mut R) -> Vec<Row> {
    rows.into_iter()
        .map(|Row(attr, cells)| {
            let cells = cells
                .into_iter()
                .map(|mut cell| {
                    cell.4 = rewrite_blocks(cell.4, rw);
                    cell
                })
                .collect();
            Row(attr, cells)
        })
        .collect()
}

fn rewrite_block<R: Rewrite + ?Sized>(block: Block, rw: &mut R) -> Option<Block> {
    let block = match block {
        Block::Plain(inlines) => Block::Plain(rewrite_inlines(inlines, rw)),
        Block::Para(inlines) => Block::Para(rewrite_inlines(inlines, rw)),
        Block::LineBlock(lines) => Block::LineBlock(
            lines
                .into_iter()
                .map(|line| rewrite_inlines(line, rw))
                .collect(),
        ),
        Block::BlockQuote(blocks) => Block::BlockQuote(rewrite_blocks(blocks, rw)),
        Block::OrderedList(attrs, items) => Block::OrderedList(attrs, rewrite_items(items, rw)),
        Block::BulletList(items) => Block::BulletList(rewrite_items(items, rw)),
        Block::DefinitionList(entries) => Block::DefinitionList(
            entries
                .into_iter()
                .map(|(term, definitions)| {
                    let term = rewrite_inlines(term, rw);
                    (term, rewrite_items(definitions, rw))
                })
                .collect(),
        ),
        Block::Header(level, attr, inlines) => {
            Block::Header(level, attr, rewrite_inlines(inlines, rw))
        }
        Block::Table(attr, caption, colspecs, head, bodies, foot) => {
            let caption = rewrite_caption(caption, rw);
            let TableHead(head_attr, head_rows) = head;
            let head = TableHead(head_attr, rewrite_rows(head_rows, rw));
            let bodies = bodies
                .into_iter()
                .map(|TableBody(body_attr, row_heads, intermediate, rows)| {
                    let intermediate = rewrite_rows(intermediate, rw);
                    TableBody(body_attr, row_heads, intermediate, rewrite_rows(rows, rw))
                })
                .collect();
            let TableFoot(foot_attr, foot_rows) = foot;
            let foot = TableFoot(foot_attr, rewrite_rows(foot_rows, rw));
            Block::Table(attr, caption, colspecs, head, bodies, foot)
        }
        Block::Figure(attr, caption, blocks) => {
            let caption = rewrite_caption(caption, rw);
            Block::Figure(attr, caption, rewrite_blocks(blocks, rw))
        }
        Block::Div(attr, blocks) => Block::Div(attr, rewrite_blocks(blocks, rw)),
        leaf @ (Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule) => leaf,
    };
    rw.block(block)
}

fn rewrite_inlines<R: Rewrite + ?Sized>(inlines: Vec<Inline>, rw: &mut R) -> Vec<Inline> {
    inlines
        .into_iter()
        .map(|inline| rewrite_inline(inline, rw))
        .collect()
}

fn rewrite_inline<R: Rewrite + ?Sized>(inline: Inline, rw: &mut R) -> Inline {
    let inline = match inline {
        Inline::Emph(children) => Inline::Emph(rewrite_inlines(children, rw)),
        Inline::Underline(children) => Inline::Underline(rewrite_inlines(children, rw)),
        Inline::Strong(children) => Inline::Strong(rewrite_inlines(children, rw)),
        Inline::Strikeout(children) => Inline::Strikeout(rewrite_inlines(children, rw)),
        Inline::Superscript(children) => Inline::Superscript(rewrite_inlines(children, rw)),
        Inline::Subscript(children) => Inline::Subscript(rewrite_inlines(children, rw)),
        Inline::SmallCaps(children) => Inline::SmallCaps(rewrite_inlines(children, rw)),
        Inline::Quoted(kind, children) => Inline::Quoted(kind, rewrite_inlines(children, rw)),
        Inline::Cite(citations, children) => {
            let citations = citations
                .into_iter()
                .map(|citation| Citation {
                    prefix: rewrite_inlines(citation.prefix, rw),
                    suffix: rewrite_inlines(citation.suffix, rw),
                    ..citation
                })
                .collect();
            Inline::Cite(citations, rewrite_inlines(children, rw))
        }
        Inline::Link(attr, children, target) => {
            Inline::Link(attr, rewrite_inlines(children, rw), target)
        }
        Inline::Image(attr, children, target) => {
            Inline::Image(attr, rewrite_inlines(children, rw), target)
        }
        Inline::Span(attr, children) => Inline::Span(attr, rewrite_inlines(children, rw)),
        Inline::Note(blocks) => Inline::Note(rewrite_blocks(blocks, rw)),
        leaf @ (Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..)) => leaf,
    };
    rw.inline(inline)
}

/// Visit every block in document order, parents before their children.
///
/// Blocks nested inside footnotes are visited where the note occurs.
pub fn visit_blocks<'a, F>(blocks: &'a [Block], f: &mut F)
where
    F: FnMut(&'a Block),
{
    for block in blocks {
        f(block);
        match block {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
                visit_inline_blocks(inlines, f);
            }
            Block::LineBlock(lines) => {
                for line in lines {
                    visit_inline_blocks(line, f);
                }
            }
            Block::BlockQuote(children) | Block::Div(_, children) => visit_blocks(children, f),
            Block::Table(_, caption, _, head, bodies, foot) => {
                visit_caption_blocks(caption, f);
                visit_row_blocks(&head.1, f);
                for body in bodies {
                    visit_row_blocks(&body.2, f);
                    visit_row_blocks(&body.3, f);
                }
                visit_row_blocks(&foot.1, f);
            }
            Block::Figure(_, caption, children) => {
                visit_caption_blocks(caption, f);
                visit_blocks(children, f);
            }
            Block::OrderedList(_, items) | Block::BulletList(items) => {
                for item in items {
                    visit_blocks(item, f);
                }
            }
            Block::DefinitionList(entries) => {
                for (term, definitions) in entries {
                    visit_inline_blocks(term, f);
                    for definition in definitions {
                        visit_blocks(definition, f);
                    }
                }
            }
            Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => {}
        }
    }
}

fn visit_caption_blocks<'a, F>(Caption(short, blocks): &'a Caption, f: &mut F)
where
    F: FnMut(&'a Block),
{
    if let Some(short) = short {
        visit_inline_blocks(short, f);
    }
    visit_blocks(blocks, f);
}

fn visit_row_blocks<'a, F>(rows: &'a [Row], f: &mut F)
where
    F: FnMut(&'a Block),
{
    for Row(_, cells) in rows {
        for cell in cells {
            visit_blocks(&cell.4, f);
        }
    }
}

fn visit_inline_blocks<'a, F>(inlines: &'a [Inline], f: &mut F)
where
    F: FnMut(&'a Block),
{
    for inline in inlines {
        match inline {
            Inline::Note(blocks) => visit_blocks(blocks, f),
            Inline::Cite(citations, children) => {
                for citation in citations {
                    visit_inline_blocks(&citation.prefix, f);
                    visit_inline_blocks(&citation.suffix, f);
                }
                visit_inline_blocks(children, f);
            }
            Inline::Emph(children)
            | Inline::Underline(children)
            | Inline::Strong(children)
            | Inline::Strikeout(children)
            | Inline::Superscript(children)
            | Inline::Subscript(children)
            | Inline::SmallCaps(children)
            | Inline::Quoted(_, children)
            | Inline::Link(_, children, _)
            | Inline::Image(_, children, _)
            | Inline::Span(_, children) => visit_inline_blocks(children, f),
            Inline::Str(_)
            | Inline::Code(..)
            | Inline::Space
            | Inline::SoftBreak
            | Inline::LineBreak
            | Inline::Math(..)
            | Inline::RawInline(..) => {}
        }
    }
}
