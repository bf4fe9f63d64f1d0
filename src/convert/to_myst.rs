//! Backward conversion: document tree to MyST AST.
//!
//! Every structural node is a direct shape translation; nothing here needs
//! search or backtracking. Nodes whose content is flow map children 1:1,
//! nodes whose content is phrasing hand their leaf sequence to the mark-span
//! reconstruction, which is where the real work happens.

use crate::convert::{mark_spans, opaque};
use crate::doc::nodes as doc;
use crate::doc::nodes::DocNode;
use crate::myst::nodes as myst;
use crate::myst::nodes::MystNode;

/// Convert one document node back into an AST node.
pub(crate) fn from_doc_node(node: &DocNode) -> MystNode {
    match node {
        DocNode::Root(n) => MystNode::Root(myst::Root {
            children: flow_children(&n.children),
        }),
        DocNode::Block(n) => MystNode::Block(myst::Block {
            meta: n.meta.clone(),
            children: flow_children(&n.children),
        }),
        DocNode::BlockBreak(n) => MystNode::BlockBreak(myst::BlockBreak {
            meta: n.meta.clone(),
        }),
        DocNode::Paragraph(n) => MystNode::Paragraph(myst::Paragraph {
            children: inline_children(&n.children),
        }),
        DocNode::Heading(n) => MystNode::Heading(myst::Heading {
            depth: n.level,
            enumerated: Some(n.enumerated),
            enumerator: n.enumerator.clone(),
            identifier: n.identifier.clone(),
            label: n.label.clone(),
            children: inline_children(&n.children),
        }),
        DocNode::ThematicBreak => MystNode::ThematicBreak,
        DocNode::Blockquote(n) => MystNode::Blockquote(myst::Blockquote {
            children: flow_children(&n.children),
        }),
        DocNode::List(n) => MystNode::List(myst::List {
            ordered: Some(n.ordered),
            start: Some(n.start),
            spread: Some(n.spread),
            children: flow_children(&n.children),
        }),
        DocNode::ListItem(n) => MystNode::ListItem(myst::ListItem {
            spread: Some(n.spread),
            children: flow_children(&n.children),
        }),
        DocNode::CodeBlock(n) => MystNode::Code(myst::Code {
            lang: Some(n.lang.clone()),
            meta: n.meta.clone(),
            class: Some(n.class.clone()),
            show_line_numbers: Some(n.show_line_numbers),
            emphasize_lines: Some(n.emphasize_lines.clone()),
            identifier: n.identifier.clone(),
            label: n.label.clone(),
            value: n.value.clone(),
        }),
        DocNode::Html(n) => MystNode::Html(myst::Html {
            value: n.value.clone(),
        }),
        DocNode::Definition(n) => MystNode::Definition(myst::Definition {
            identifier: n.identifier.clone(),
            url: n.url.clone(),
        }),
        DocNode::Target(n) => MystNode::Target(myst::Target {
            label: Some(n.label.clone()),
        }),
        DocNode::Directive(n) => MystNode::Directive(myst::Directive {
            name: n.name.clone(),
            args: Some(n.args.clone()),
            value: Some(n.value.clone()),
            children: flow_children(&n.children),
        }),
        DocNode::Admonition(n) => MystNode::Admonition(myst::Admonition {
            kind: Some(n.kind.clone()),
            class: n.class.clone(),
            children: flow_children(&n.children),
        }),
        DocNode::AdmonitionTitle(n) => MystNode::AdmonitionTitle(myst::AdmonitionTitle {
            children: inline_children(&n.children),
        }),
        DocNode::Container(n) => MystNode::Container(myst::Container {
            kind: Some(n.kind.clone()),
            children: flow_children(&n.children),
        }),
        DocNode::MathBlock(n) => MystNode::Math(myst::Math {
            identifier: n.identifier.clone(),
            label: n.label.clone(),
            enumerated: Some(n.enumerated),
            enumerator: n.enumerator.clone(),
            value: n.value.clone(),
        }),
        DocNode::Table(n) => MystNode::Table(myst::Table {
            children: flow_children(&n.children),
        }),
        DocNode::TableRow(n) => MystNode::TableRow(myst::TableRow {
            children: flow_children(&n.children),
        }),
        DocNode::TableCell(n) => MystNode::TableCell(myst::TableCell {
            align: n.align.clone(),
            header: n.header.then_some(true),
            children: flow_children(&n.children),
        }),
        DocNode::ImageWrapper(n) => from_image_wrapper(n),
        DocNode::Caption(n) => MystNode::Caption(myst::Caption {
            children: flow_children(&n.children),
        }),
        DocNode::CaptionNumber(n) => MystNode::CaptionNumber(myst::CaptionNumber {
            kind: n.kind.clone(),
            label: n.label.clone(),
            identifier: n.identifier.clone(),
            html_id: n.html_id.clone(),
            enumerator: n.enumerator.clone(),
            children: inline_children(&n.children),
        }),
        DocNode::Aside(n) => MystNode::Aside(myst::Aside {
            kind: n.kind.clone(),
            class: n.class.clone(),
            label: n.label.clone(),
            children: flow_children(&n.children),
        }),
        DocNode::FootnoteDefinition(n) => {
            MystNode::FootnoteDefinition(myst::FootnoteDefinition {
                identifier: Some(n.identifier.clone()),
                children: flow_children(&n.children),
            })
        }
        DocNode::UnsupportedBlock(n) => opaque::restore(&n.original, n.editable, &n.value),
        DocNode::Text(n) => MystNode::Text(myst::Text {
            value: n.text.clone(),
        }),
        DocNode::Image(n) => from_image_leaf(n),
        DocNode::InlineMath(n) => MystNode::InlineMath(myst::InlineMath {
            value: n.value.clone(),
        }),
        DocNode::HardBreak(_) => MystNode::Break,
    }
}

fn flow_children(children: &[DocNode]) -> Vec<MystNode> {
    children.iter().map(from_doc_node).collect()
}

fn inline_children(children: &[DocNode]) -> Vec<MystNode> {
    mark_spans::reconstruct(children)
}

/// Unwraps the synthetic wrapper the forward converter put around images.
fn from_image_wrapper(wrapper: &doc::ImageWrapper) -> MystNode {
    match wrapper.children.first() {
        Some(DocNode::Image(leaf)) => from_image_leaf(leaf),
        _ => MystNode::Image(myst::Image {
            url: String::new(),
            alt: None,
            title: None,
            class: None,
            width: None,
            align: None,
        }),
    }
}

fn from_image_leaf(leaf: &doc::ImageLeaf) -> MystNode {
    MystNode::Image(myst::Image {
        url: leaf.url.clone(),
        alt: Some(leaf.alt.clone()),
        title: Some(leaf.title.clone()),
        class: Some(leaf.class.clone()),
        width: Some(leaf.width.clone()),
        align: Some(leaf.align.clone()),
    })
}
