//! Document filter entry point.

use dgm_builder::{DiagramBuilder, ProcessBuilder};
use dgm_config::FilterConfig;
use dgm_doc::Pandoc;

use crate::block::BlockTransformer;
use crate::definitions::collect_definitions;
use crate::diagnostics::DiagnosticSink;
use crate::error::FilterError;
use crate::inline::InlineTransformer;
use crate::options::DocumentOptions;
use crate::render::DiagramRenderer;
use crate::tags::Markers;

/// Replaces diagram code in documents with rendered images.
///
/// # Example
///
/// ```no_run
/// use dgm_config::FilterConfig;
/// use dgm_filter::DiagramFilter;
///
/// let config = FilterConfig::load(None)?;
/// let filter = DiagramFilter::from_config(&config);
/// let output = filter.apply_json(r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DiagramFilter<B> {
    renderer: DiagramRenderer<B>,
    markers: Markers,
    expression: String,
}

impl DiagramFilter<ProcessBuilder> {
    /// Filter rendering through the configured renderer program.
    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        let builder = ProcessBuilder::new(&config.builder.program).args(config.builder.args.clone());
        Self::new(builder, config)
    }
}

impl<B: DiagramBuilder> DiagramFilter<B> {
    pub fn new(builder: B, config: &FilterConfig) -> Self {
        let renderer = DiagramRenderer::new(
            builder,
            config.render.imports.clone(),
            config.render.output_dir.clone(),
        )
        .pad_factor(config.render.pad_factor);

        Self {
            renderer,
            markers: Markers {
                diagram: config.markers.diagram.clone(),
                definition: config.markers.definition.clone(),
            },
            expression: config.render.expression.clone(),
        }
    }

    /// Set where failure messages are reported (default: stderr).
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.renderer = self.renderer.sink(sink);
        self
    }

    #[must_use]
    pub fn renderer(&self) -> &DiagramRenderer<B> {
        &self.renderer
    }

    /// Bodies of the document's definition blocks, in document order.
    #[must_use]
    pub fn definitions(&self, doc: &Pandoc) -> Vec<String> {
        collect_definitions(&doc.blocks, &self.markers.definition)
    }

    /// Replace diagram blocks and remove definition blocks.
    #[must_use]
    pub fn transform_blocks(&self, doc: Pandoc) -> Pandoc {
        let definitions = self.definitions(&doc);
        self.block_pass(doc, &definitions)
    }

    /// Replace diagram inline spans.
    #[must_use]
    pub fn transform_inlines(&self, doc: Pandoc) -> Pandoc {
        let definitions = self.definitions(&doc);
        self.inline_pass(doc, &definitions)
    }

    /// Run the block pass, then the inline pass.
    ///
    /// Both passes see the definitions of the document as given, even though
    /// the block pass removes the definition blocks.
    #[must_use]
    pub fn apply(&self, doc: Pandoc) -> Pandoc {
        let definitions = self.definitions(&doc);
        let doc = self.block_pass(doc, &definitions);
        self.inline_pass(doc, &definitions)
    }

    /// [`apply`](Self::apply) on a pandoc JSON document.
    pub fn apply_json(&self, input: &str) -> Result<String, FilterError> {
        let doc = Pandoc::from_json(input)?;
        Ok(self.apply(doc).to_json()?)
    }

    fn block_pass(&self, doc: Pandoc, definitions: &[String]) -> Pandoc {
        let options = DocumentOptions::from_meta(&doc.meta);
        let _span = tracing::debug_span!("block_pass", definitions = definitions.len()).entered();

        let mut pass = BlockTransformer {
            renderer: &self.renderer,
            markers: &self.markers,
            expression: &self.expression,
            definitions,
            secondary: options.secondary(),
        };
        doc.rewrite(&mut pass)
    }

    fn inline_pass(&self, doc: Pandoc, definitions: &[String]) -> Pandoc {
        let _span = tracing::debug_span!("inline_pass", definitions = definitions.len()).entered();

        let mut pass = InlineTransformer {
            renderer: &self.renderer,
            marker: &self.markers.diagram,
            definitions,
        };
        doc.rewrite(&mut pass)
    }
}

#[cfg(test)]
mod tests {
    use dgm_builder::BuildOutcome;
    use dgm_doc::{Attr, Block, Inline, MetaValue};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::testing::{FakeBuilder, RecordingSink};

    fn config(dir: &std::path::Path) -> FilterConfig {
        let mut config = FilterConfig::default();
        config.render.output_dir = dir.to_path_buf();
        config
    }

    fn code(classes: &[&str], text: &str) -> Block {
        Block::CodeBlock(Attr::with_classes(classes.iter().copied()), text.to_owned())
    }

    #[test]
    fn test_apply_inline_only_document() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(tmp.path()))
            .with_sink(RecordingSink::default());
        let doc = Pandoc::new(vec![Block::Para(vec![
            Inline::Str("A".to_owned()),
            Inline::Space,
            Inline::Code(Attr::with_classes(["diagram"]), "circle 1".to_owned()),
        ])]);

        let result = filter.apply(doc);

        let requests = builder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].expression, "circle 1");
        let Block::Para(inlines) = &result.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inlines.len(), 3);
        assert!(matches!(inlines[2], Inline::Image(..)));
    }

    #[test]
    fn test_apply_inline_pass_sees_removed_definitions() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(tmp.path()))
            .with_sink(RecordingSink::default());
        let doc = Pandoc::new(vec![
            code(&["diagram-def"], "gSq = square 1"),
            Block::Para(vec![Inline::Code(
                Attr::with_classes(["diagram"]),
                "gSq".to_owned(),
            )]),
        ]);

        let result = filter.apply(doc);

        assert_eq!(result.blocks.len(), 1);
        assert!(matches!(&result.blocks[0], Block::Para(inlines) if matches!(inlines[0], Inline::Image(..))));
        assert_eq!(builder.requests()[0].declarations, vec!["gSq = square 1"]);
    }

    #[test]
    fn test_transform_blocks_leaves_inlines() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(tmp.path()))
            .with_sink(RecordingSink::default());
        let para = Block::Para(vec![Inline::Code(
            Attr::with_classes(["diagram"]),
            "circle 1".to_owned(),
        )]);
        let doc = Pandoc::new(vec![para.clone()]);

        let result = filter.transform_blocks(doc);

        assert_eq!(result.blocks, vec![para]);
        assert!(builder.requests().is_empty());
    }

    #[test]
    fn test_apply_uses_document_options() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(&tmp.path().join("main")))
            .with_sink(RecordingSink::default());
        let thumbs = tmp.path().join("thumbs");
        let mut doc = Pandoc::new(vec![code(&["diagram"], "dia = circle 1")]);
        doc.meta.insert(
            "imgdir".to_owned(),
            MetaValue::String(thumbs.to_string_lossy().into_owned()),
        );
        doc.meta
            .insert("imgsize".to_owned(), MetaValue::String("64x48".to_owned()));

        let _ = filter.apply(doc);

        let requests = builder.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].output_dir, thumbs);
    }

    #[test]
    fn test_apply_repeated_runs_share_directory() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let sink = RecordingSink::default();
        let filter = DiagramFilter::new(&builder, &config(&tmp.path().join("out")))
            .with_sink(sink.clone());
        let doc = Pandoc::new(vec![code(&["diagram"], "dia = circle 1")]);

        let first = filter.transform_blocks(doc.clone());
        let second = filter.transform_blocks(doc);

        assert_eq!(first, second);
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_failure_reported_once_per_node() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::new(|request| {
            if request.declarations.iter().any(|d| d.contains("undefined")) {
                Ok(BuildOutcome::InterpError("Variable not in scope: undefinedThing".to_owned()))
            } else {
                Ok(BuildOutcome::Skipped {
                    hash: "ok".to_owned(),
                })
            }
        });
        let sink = RecordingSink::default();
        let filter = DiagramFilter::new(&builder, &config(tmp.path())).with_sink(sink.clone());
        let doc = Pandoc::new(vec![
            code(&["diagram"], "dia = undefinedThing"),
            code(&["diagram"], "dia = circle 1"),
        ]);

        let result = filter.apply(doc);

        assert_eq!(
            result.blocks[0],
            code(
                &["diagram"],
                "dia = undefinedThing\nInterpreter error: Variable not in scope: undefinedThing"
            )
        );
        assert!(matches!(result.blocks[1], Block::Para(_)));
        assert_eq!(
            sink.messages(),
            vec!["Interpreter error: Variable not in scope: undefinedThing"]
        );
    }

    #[test]
    fn test_apply_json() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::new(|_| {
            Ok(BuildOutcome::Skipped {
                hash: "abc".to_owned(),
            })
        });
        let filter = DiagramFilter::new(&builder, &config(tmp.path()))
            .with_sink(RecordingSink::default());
        let input = r#"{
            "pandoc-api-version": [1, 23, 1],
            "meta": {},
            "blocks": [
                {"t": "CodeBlock", "c": [["", ["diagram-def"], []], "a = 1"]},
                {"t": "CodeBlock", "c": [["", ["diagram"], []], "dia = a"]}
            ]
        }"#;

        let output = filter.apply_json(input).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let expected_url = tmp.path().join("abc.png").to_string_lossy().into_owned();
        assert_eq!(
            json["blocks"],
            serde_json::json!([{
                "t": "Para",
                "c": [{"t": "Image", "c": [["", [], []], [], [expected_url, ""]]}]
            }])
        );
    }

    #[test]
    fn test_apply_json_invalid_input() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(tmp.path()));

        let err = filter.apply_json("not json").unwrap_err();

        assert!(matches!(err, FilterError::Document(_)));
    }

    #[test]
    fn test_custom_markers_and_expression() {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let mut config = config(tmp.path());
        config.markers.diagram = "dia".to_owned();
        config.markers.definition = "dia-def".to_owned();
        config.render.expression = "example".to_owned();
        let filter = DiagramFilter::new(&builder, &config).with_sink(RecordingSink::default());
        let doc = Pandoc::new(vec![
            code(&["dia-def"], "s = square 1"),
            code(&["diagram"], "ignored"),
            code(&["dia"], "example = s"),
        ]);

        let result = filter.apply(doc);

        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0], code(&["diagram"], "ignored"));
        let requests = builder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].expression, "example");
        assert_eq!(requests[0].declarations, vec!["example = s", "s = square 1"]);
    }

    /// Runs `apply_json` on a document holding `block` followed by one
    /// diagram block, returning the output blocks and the request count.
    fn apply_json_alongside(block: &str) -> (serde_json::Value, usize) {
        let tmp = TempDir::new().unwrap();
        let builder = FakeBuilder::rendering();
        let filter = DiagramFilter::new(&builder, &config(tmp.path()))
            .with_sink(RecordingSink::default());
        let input = format!(
            r#"{{
                "pandoc-api-version": [1, 23, 1],
                "meta": {{}},
                "blocks": [
                    {block},
                    {{"t": "CodeBlock", "c": [["", ["diagram"], []], "dia = circle 1"]}}
                ]
            }}"#
        );

        let output = filter.apply_json(&input).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        (json["blocks"].clone(), builder.requests().len())
    }

    #[test]
    fn test_apply_json_with_table() {
        let table = r#"{"t": "Table", "c": [
            ["", [], []],
            [null, []],
            [[{"t": "AlignDefault"}, {"t": "ColWidthDefault"}]],
            [["", [], []], []],
            [[["", [], []], 0, [], [[["", [], []], [[["", [], []], {"t": "AlignDefault"}, 1, 1,
                [{"t": "Plain", "c": [{"t": "Code", "c": [["", ["diagram"], []], "circle 2"]}]}]]]]]]],
            [["", [], []], []]
        ]}"#;

        let (blocks, requests) = apply_json_alongside(table);

        assert_eq!(requests, 2);
        assert_eq!(blocks[0]["t"], "Table");
        let cell_inline = &blocks[0]["c"][4][0][3][0][1][0][4][0]["c"][0];
        assert_eq!(cell_inline["t"], "Image");
        assert_eq!(blocks[1]["t"], "Para");
    }

    #[test]
    fn test_apply_json_with_figure() {
        let figure = r#"{"t": "Figure", "c": [
            ["", [], []],
            [null, [{"t": "Plain", "c": [{"t": "Str", "c": "Caption"}]}]],
            [{"t": "CodeBlock", "c": [["", ["diagram"], []], "dia = square 1"]}]
        ]}"#;

        let (blocks, requests) = apply_json_alongside(figure);

        assert_eq!(requests, 2);
        assert_eq!(blocks[0]["t"], "Figure");
        assert_eq!(blocks[0]["c"][2][0]["t"], "Para");
        assert_eq!(blocks[0]["c"][2][0]["c"][0]["t"], "Image");
    }

    #[test]
    fn test_apply_json_with_citation() {
        let cite = r#"{"t": "Para", "c": [{"t": "Cite", "c": [
            [{
                "citationId": "knuth84",
                "citationPrefix": [],
                "citationSuffix": [],
                "citationMode": {"t": "AuthorInText"},
                "citationNoteNum": 1,
                "citationHash": 0
            }],
            [{"t": "Str", "c": "@knuth84"}]
        ]}]}"#;

        let (blocks, requests) = apply_json_alongside(cite);

        assert_eq!(requests, 1);
        assert_eq!(
            blocks[0],
            serde_json::from_str::<serde_json::Value>(cite).unwrap()
        );
        assert_eq!(blocks[1]["t"], "Para");
    }
}
