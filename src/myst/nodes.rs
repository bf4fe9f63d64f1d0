//! Core data structures for the MyST abstract syntax tree.
//!
//! The vocabulary is closed: every tag the external parser is documented to
//! emit has its own variant with a fixed attribute shape, and everything else
//! lands in [`MystNode::Unknown`], which carries the node exactly as the
//! parser emitted it. Each variant has either an ordered child sequence or a
//! terminal string value, never both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of the MyST abstract syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MystNode {
    Root(Root),
    Block(Block),
    Paragraph(Paragraph),
    Heading(Heading),
    ThematicBreak,
    Blockquote(Blockquote),
    List(List),
    ListItem(ListItem),
    Code(Code),
    Html(Html),
    Definition(Definition),
    Target(Target),
    Directive(Directive),
    Admonition(Admonition),
    AdmonitionTitle(AdmonitionTitle),
    Container(Container),
    Math(Math),
    Table(Table),
    TableRow(TableRow),
    TableCell(TableCell),
    Caption(Caption),
    CaptionNumber(CaptionNumber),
    Aside(Aside),
    FootnoteDefinition(FootnoteDefinition),
    BlockBreak(BlockBreak),
    Text(Text),
    Emphasis(Emphasis),
    Strong(Strong),
    Link(Link),
    Subscript(Subscript),
    Superscript(Superscript),
    Underline(Underline),
    Delete(Delete),
    InlineCode(InlineCode),
    InlineMath(InlineMath),
    Image(Image),
    Break,
    /// A node the converter has no handler for, kept as the parser emitted it.
    Unknown(Opaque),
}

impl MystNode {
    /// The node's tag as it appears in the serialized AST.
    pub fn tag(&self) -> &str {
        match self {
            MystNode::Root(_) => "root",
            MystNode::Block(_) => "block",
            MystNode::Paragraph(_) => "paragraph",
            MystNode::Heading(_) => "heading",
            MystNode::ThematicBreak => "thematicBreak",
            MystNode::Blockquote(_) => "blockquote",
            MystNode::List(_) => "list",
            MystNode::ListItem(_) => "listItem",
            MystNode::Code(_) => "code",
            MystNode::Html(_) => "html",
            MystNode::Definition(_) => "definition",
            MystNode::Target(_) => "mystTarget",
            MystNode::Directive(_) => "mystDirective",
            MystNode::Admonition(_) => "admonition",
            MystNode::AdmonitionTitle(_) => "admonitionTitle",
            MystNode::Container(_) => "container",
            MystNode::Math(_) => "math",
            MystNode::Table(_) => "table",
            MystNode::TableRow(_) => "tableRow",
            MystNode::TableCell(_) => "tableCell",
            MystNode::Caption(_) => "caption",
            MystNode::CaptionNumber(_) => "captionNumber",
            MystNode::Aside(_) => "aside",
            MystNode::FootnoteDefinition(_) => "footnoteDefinition",
            MystNode::BlockBreak(_) => "blockBreak",
            MystNode::Text(_) => "text",
            MystNode::Emphasis(_) => "emphasis",
            MystNode::Strong(_) => "strong",
            MystNode::Link(_) => "link",
            MystNode::Subscript(_) => "subscript",
            MystNode::Superscript(_) => "superscript",
            MystNode::Underline(_) => "underline",
            MystNode::Delete(_) => "delete",
            MystNode::InlineCode(_) => "inlineCode",
            MystNode::InlineMath(_) => "inlineMath",
            MystNode::Image(_) => "image",
            MystNode::Break => "break",
            MystNode::Unknown(opaque) => opaque.tag().unwrap_or("unknown"),
        }
    }
}

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

/// A top-level grouping block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub depth: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockquote {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<bool>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<bool>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(
        rename = "showLineNumbers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub show_line_numbers: Option<bool>,
    #[serde(
        rename = "emphasizeLines",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub emphasize_lines: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Html {
    #[serde(default)]
    pub value: String,
}

/// A link reference definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// A cross-reference target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A generic `{name}` directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admonition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmonitionTitle {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

/// A figure or table container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

/// A display math block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Math {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerator: Option<String>,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<bool>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionNumber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerator: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

/// A margin or sidebar note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aside {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockBreak {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strong {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Superscript {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Underline {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    #[serde(default)]
    pub children: Vec<MystNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineCode {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineMath {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

/// A serialized snapshot of a node the converter has no handler for.
///
/// The payload is kept as inert data; the accessors below expose the few
/// shape questions the fallback policy asks of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    pub payload: Value,
}

impl Opaque {
    pub fn new(payload: Value) -> Self {
        Opaque { payload }
    }

    /// The payload's `type` tag, if it has one.
    pub fn tag(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }

    /// Whether the payload carries an ordered child sequence.
    pub fn has_children(&self) -> bool {
        self.payload
            .get("children")
            .map_or(false, |children| children.is_array())
    }

    /// The payload's generic structured-data field, if present.
    pub fn data(&self) -> Option<&Value> {
        self.payload.get("data")
    }

    /// The payload's terminal string value, if present.
    pub fn string_value(&self) -> Option<&str> {
        self.payload.get("value").and_then(Value::as_str)
    }
}
