//! Core data structures for the editor document tree.
//!
//! Block nodes mirror the content-model vocabulary; inline leaves carry a
//! [`MarkSet`] instead of nesting formatting wrappers, which is the one
//! structural difference from the AST side. Nodes that hold terminal text
//! (`code_block`, `math`, `html`, `inlineMath`, `unsupported_block`) store it
//! as a plain `value` and have no structural children.

use serde_json::Value;

use super::marks::MarkSet;

/// A node of the editor document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Root(Root),
    Block(Block),
    BlockBreak(BlockBreak),
    Paragraph(Paragraph),
    Heading(Heading),
    ThematicBreak,
    Blockquote(Blockquote),
    List(List),
    ListItem(ListItem),
    CodeBlock(CodeBlock),
    Html(Html),
    Definition(Definition),
    Target(Target),
    Directive(Directive),
    Admonition(Admonition),
    AdmonitionTitle(AdmonitionTitle),
    Container(Container),
    MathBlock(MathBlock),
    Table(Table),
    TableRow(TableRow),
    TableCell(TableCell),
    ImageWrapper(ImageWrapper),
    Caption(Caption),
    CaptionNumber(CaptionNumber),
    Aside(Aside),
    FootnoteDefinition(FootnoteDefinition),
    UnsupportedBlock(UnsupportedBlock),
    Text(TextLeaf),
    Image(ImageLeaf),
    InlineMath(InlineMathLeaf),
    HardBreak(HardBreak),
}

impl DocNode {
    /// The node's tag, the key into the content-model table.
    pub fn tag(&self) -> &'static str {
        match self {
            DocNode::Root(_) => "root",
            DocNode::Block(_) => "block",
            DocNode::BlockBreak(_) => "blockBreak",
            DocNode::Paragraph(_) => "paragraph",
            DocNode::Heading(_) => "heading",
            DocNode::ThematicBreak => "thematicBreak",
            DocNode::Blockquote(_) => "blockquote",
            DocNode::List(_) => "list",
            DocNode::ListItem(_) => "listItem",
            DocNode::CodeBlock(_) => "code_block",
            DocNode::Html(_) => "html",
            DocNode::Definition(_) => "definition",
            DocNode::Target(_) => "target",
            DocNode::Directive(_) => "directive",
            DocNode::Admonition(_) => "admonition",
            DocNode::AdmonitionTitle(_) => "admonitionTitle",
            DocNode::Container(_) => "container",
            DocNode::MathBlock(_) => "math",
            DocNode::Table(_) => "table",
            DocNode::TableRow(_) => "table_row",
            DocNode::TableCell(_) => "table_cell",
            DocNode::ImageWrapper(_) => "imageWrapper",
            DocNode::Caption(_) => "caption",
            DocNode::CaptionNumber(_) => "captionNumber",
            DocNode::Aside(_) => "aside",
            DocNode::FootnoteDefinition(_) => "footnoteDefinition",
            DocNode::UnsupportedBlock(_) => "unsupported_block",
            DocNode::Text(_) => "text",
            DocNode::Image(_) => "image",
            DocNode::InlineMath(_) => "inlineMath",
            DocNode::HardBreak(_) => "break",
        }
    }

    /// The node's structural children; empty for leaves and value nodes.
    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Root(n) => &n.children,
            DocNode::Block(n) => &n.children,
            DocNode::Paragraph(n) => &n.children,
            DocNode::Heading(n) => &n.children,
            DocNode::Blockquote(n) => &n.children,
            DocNode::List(n) => &n.children,
            DocNode::ListItem(n) => &n.children,
            DocNode::Directive(n) => &n.children,
            DocNode::Admonition(n) => &n.children,
            DocNode::AdmonitionTitle(n) => &n.children,
            DocNode::Container(n) => &n.children,
            DocNode::Table(n) => &n.children,
            DocNode::TableRow(n) => &n.children,
            DocNode::TableCell(n) => &n.children,
            DocNode::ImageWrapper(n) => &n.children,
            DocNode::Caption(n) => &n.children,
            DocNode::CaptionNumber(n) => &n.children,
            DocNode::Aside(n) => &n.children,
            DocNode::FootnoteDefinition(n) => &n.children,
            _ => &[],
        }
    }

    /// The mark set of an inline leaf, if this node is one.
    pub fn marks(&self) -> Option<&MarkSet> {
        match self {
            DocNode::Text(leaf) => Some(&leaf.marks),
            DocNode::Image(leaf) => Some(&leaf.marks),
            DocNode::InlineMath(leaf) => Some(&leaf.marks),
            DocNode::HardBreak(leaf) => Some(&leaf.marks),
            _ => None,
        }
    }

    pub fn marks_mut(&mut self) -> Option<&mut MarkSet> {
        match self {
            DocNode::Text(leaf) => Some(&mut leaf.marks),
            DocNode::Image(leaf) => Some(&mut leaf.marks),
            DocNode::InlineMath(leaf) => Some(&mut leaf.marks),
            DocNode::HardBreak(leaf) => Some(&mut leaf.marks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub meta: Option<Value>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockBreak {
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub enumerated: bool,
    pub enumerator: Option<String>,
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blockquote {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub start: u32,
    pub spread: bool,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub spread: bool,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub lang: String,
    pub meta: Option<String>,
    pub class: String,
    pub show_line_numbers: bool,
    pub emphasize_lines: Vec<u32>,
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Html {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub identifier: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    pub args: String,
    pub value: String,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Admonition {
    pub kind: String,
    pub class: Option<String>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdmonitionTitle {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub kind: String,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MathBlock {
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub enumerated: bool,
    pub enumerator: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub align: Option<String>,
    pub header: bool,
    pub children: Vec<DocNode>,
}

/// Synthetic wrapper around an inline image leaf, so the image can be
/// selected and replaced as a unit in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageWrapper {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionNumber {
    pub kind: Option<String>,
    pub label: Option<String>,
    pub identifier: Option<String>,
    pub html_id: Option<String>,
    pub enumerator: Option<String>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aside {
    pub kind: Option<String>,
    pub class: Option<String>,
    pub label: Option<String>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteDefinition {
    pub identifier: String,
    pub children: Vec<DocNode>,
}

/// An unrecognized block node, shown as its editable or frozen text.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedBlock {
    /// The original node as the parser emitted it
    pub original: Value,
    /// Whether edits to the text can be written back into the original
    pub editable: bool,
    /// The text currently shown in the editor
    pub value: String,
}

/// A run of text with a set of formatting marks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLeaf {
    pub text: String,
    pub marks: MarkSet,
}

impl TextLeaf {
    pub fn plain(text: impl Into<String>) -> Self {
        TextLeaf {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLeaf {
    pub url: String,
    pub alt: String,
    pub title: String,
    pub class: String,
    pub width: String,
    pub align: String,
    pub marks: MarkSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineMathLeaf {
    pub value: String,
    pub marks: MarkSet,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HardBreak {
    pub marks: MarkSet,
}
