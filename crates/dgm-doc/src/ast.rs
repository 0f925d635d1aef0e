//! Block and inline node types.
//!
//! The shapes follow pandoc's JSON AST so documents can be exchanged with
//! pandoc-based tooling without a translation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pandoc API version written into newly created documents.
const DEFAULT_API_VERSION: [u32; 3] = [1, 23, 1];

/// A complete document: metadata plus top-level blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pandoc {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    pub meta: Meta,
    pub blocks: Vec<Block>,
}

impl Pandoc {
    /// Create a document with empty metadata.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_vec(),
            meta: Meta::new(),
            blocks,
        }
    }

    /// Look up a metadata field and flatten it to plain text.
    ///
    /// Returns `None` if the key is missing or holds a map, list or boolean.
    #[must_use]
    pub fn meta_text(&self, key: &str) -> Option<String> {
        self.meta.get(key).and_then(MetaValue::as_plain_text)
    }
}

/// Document metadata (front matter).
pub type Meta = BTreeMap<String, MetaValue>;

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MetaValue {
    #[serde(rename = "MetaMap")]
    Map(BTreeMap<String, MetaValue>),
    #[serde(rename = "MetaList")]
    List(Vec<MetaValue>),
    #[serde(rename = "MetaBool")]
    Bool(bool),
    #[serde(rename = "MetaString")]
    String(String),
    #[serde(rename = "MetaInlines")]
    Inlines(Vec<Inline>),
    #[serde(rename = "MetaBlocks")]
    Blocks(Vec<Block>),
}

impl MetaValue {
    /// Flatten a textual metadata value.
    ///
    /// Front matter such as `imgsize: 200x100` arrives as inlines; this
    /// recovers the literal text. Maps, lists and booleans yield `None`.
    #[must_use]
    pub fn as_plain_text(&self) -> Option<String> {
        let mut out = String::new();
        match self {
            Self::String(s) => out.push_str(s),
            Self::Inlines(inlines) => inlines_text(inlines, &mut out),
            Self::Blocks(blocks) => {
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    if let Block::Plain(inlines) | Block::Para(inlines) = block {
                        inlines_text(inlines, &mut out);
                    }
                }
            }
            Self::Map(_) | Self::List(_) | Self::Bool(_) => return None,
        }
        Some(out)
    }
}

fn inlines_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Str(s) | Inline::Code(_, s) | Inline::Math(_, s) => out.push_str(s),
            Inline::Space | Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Emph(children)
            | Inline::Underline(children)
            | Inline::Strong(children)
            | Inline::Strikeout(children)
            | Inline::Superscript(children)
            | Inline::Subscript(children)
            | Inline::SmallCaps(children)
            | Inline::Quoted(_, children)
            | Inline::Cite(_, children)
            | Inline::Link(_, children, _)
            | Inline::Image(_, children, _)
            | Inline::Span(_, children) => inlines_text(children, out),
            Inline::RawInline(..) | Inline::Note(_) => {}
        }
    }
}

/// Identifier, classes and key-value attributes of a node.
///
/// Serialized as pandoc's `[id, [classes], [[key, value]]]` triple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
    pub id: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

type AttrRepr = (String, Vec<String>, Vec<(String, String)>);

impl From<AttrRepr> for Attr {
    fn from((id, classes, attributes): AttrRepr) -> Self {
        Self {
            id,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrRepr {
    fn from(attr: Attr) -> Self {
        (attr.id, attr.classes, attr.attributes)
    }
}

impl Attr {
    /// Attribute carrying only classes.
    #[must_use]
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

/// Link or image destination: `[url, title]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Target {
    pub url: String,
    pub title: String,
}

impl From<(String, String)> for Target {
    fn from((url, title): (String, String)) -> Self {
        Self { url, title }
    }
}

impl From<Target> for (String, String) {
    fn from(target: Target) -> Self {
        (target.url, target.title)
    }
}

impl Target {
    /// Target with an empty title.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(String, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i32, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Attr, Caption, Vec<ColSpec>, TableHead, Vec<TableBody>, TableFoot),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

/// Inline-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    Cite(Vec<Citation>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(MathType, String),
    RawInline(String, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Span(Attr, Vec<Inline>),
    Note(Vec<Block>),
}

/// Start number, numbering style and delimiter of an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAttributes(pub i32, pub ListNumberStyle, pub ListNumberDelim);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

/// Table or figure caption: optional short form plus the full caption body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Caption(pub Option<Vec<Inline>>, pub Vec<Block>);

/// Alignment and relative width of one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColSpec(pub Alignment, pub ColWidth);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    AlignDefault,
}

/// Column width as a fraction of the text width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableHead(pub Attr, pub Vec<Row>);

/// Table body: attributes, number of row-header columns, intermediate head
/// rows and body rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBody(pub Attr, pub i32, pub Vec<Row>, pub Vec<Row>);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableFoot(pub Attr, pub Vec<Row>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row(pub Attr, pub Vec<Cell>);

/// Table cell: attributes, alignment, row span, column span and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell(pub Attr, pub Alignment, pub i32, pub i32, pub Vec<Block>);

/// One reference inside a citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "citationId")]
    pub id: String,
    #[serde(rename = "citationPrefix")]
    pub prefix: Vec<Inline>,
    #[serde(rename = "citationSuffix")]
    pub suffix: Vec<Inline>,
    #[serde(rename = "citationMode")]
    pub mode: CitationMode,
    #[serde(rename = "citationNoteNum")]
    pub note_num: i32,
    #[serde(rename = "citationHash")]
    pub hash: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}
