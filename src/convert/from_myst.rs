//! Forward conversion: MyST AST to document tree.
//!
//! Dispatch is an exhaustive match over the node vocabulary. Structural
//! nodes copy their attribute allow-list (filling gaps with the content
//! model's defaults) and recurse; nodes that are structurally formatting
//! wrappers in the AST (`emphasis`, `strong`, `link`, ...) dissolve into
//! their children with a mark stamped onto every inline result. Unknown
//! nodes take the opaque fallback.
//!
//! Two positions reshape their children: a list item or table cell whose
//! converted children are all inline gets them wrapped in a synthetic
//! paragraph, because the grammar forbids mixed inline/flow content there.

use crate::convert::{opaque, Converted};
use crate::doc::marks::{Mark, MarkSet};
use crate::doc::nodes as doc;
use crate::doc::nodes::DocNode;
use crate::error::ConvertError;
use crate::myst::nodes as myst;
use crate::myst::nodes::MystNode;
use crate::schema::{self, defaults};

/// Directive names rendered as editable content.
///
/// Children of any other directive are withheld, so the directive shows up
/// as an inert wrapper keeping only its name, arguments and body text.
pub const SUPPORTED_DIRECTIVES: [&str; 11] = [
    "admonition",
    "attention",
    "caution",
    "danger",
    "error",
    "important",
    "hint",
    "note",
    "seealso",
    "tip",
    "warning",
];

/// Convert one AST node.
pub(crate) fn transform(node: &MystNode, safe: bool) -> Result<Converted, ConvertError> {
    let converted = match node {
        MystNode::Root(n) => one(DocNode::Root(doc::Root {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Block(n) => one(DocNode::Block(doc::Block {
            meta: n.meta.clone(),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Paragraph(n) => one(DocNode::Paragraph(doc::Paragraph {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Heading(n) => one(DocNode::Heading(doc::Heading {
            level: n.depth,
            enumerated: n.enumerated.unwrap_or(false),
            enumerator: n.enumerator.clone(),
            identifier: n.identifier.clone(),
            label: n.label.clone(),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::ThematicBreak => one(DocNode::ThematicBreak),
        MystNode::Blockquote(n) => one(DocNode::Blockquote(doc::Blockquote {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::List(n) => one(DocNode::List(doc::List {
            ordered: n.ordered.unwrap_or(false),
            start: n.start.unwrap_or(defaults::LIST_START),
            spread: n.spread.unwrap_or(false),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::ListItem(n) => one(from_list_item(n, safe)?),
        MystNode::Code(n) => one(from_code(n)),
        MystNode::Html(n) => one(DocNode::Html(doc::Html {
            value: n.value.clone(),
        })),
        MystNode::Definition(n) => one(DocNode::Definition(doc::Definition {
            identifier: n.identifier.clone(),
            url: n.url.clone(),
        })),
        MystNode::Target(n) => one(DocNode::Target(doc::Target {
            label: n
                .label
                .as_deref()
                .map(|label| label.trim().to_lowercase())
                .unwrap_or_default(),
        })),
        MystNode::Directive(n) => one(from_directive(n, safe)?),
        MystNode::Admonition(n) => one(DocNode::Admonition(doc::Admonition {
            kind: n
                .kind
                .clone()
                .unwrap_or_else(|| defaults::ADMONITION_KIND.to_string()),
            class: n.class.clone(),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::AdmonitionTitle(n) => one(DocNode::AdmonitionTitle(doc::AdmonitionTitle {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Container(n) => one(DocNode::Container(doc::Container {
            kind: n
                .kind
                .clone()
                .unwrap_or_else(|| defaults::CONTAINER_KIND.to_string()),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Math(n) => one(DocNode::MathBlock(doc::MathBlock {
            identifier: n.identifier.clone(),
            label: n.label.clone(),
            enumerated: n.enumerated.unwrap_or(false),
            enumerator: n.enumerator.clone(),
            value: n.value.clone(),
        })),
        MystNode::Table(n) => one(DocNode::Table(doc::Table {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::TableRow(n) => one(DocNode::TableRow(doc::TableRow {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::TableCell(n) => one(from_table_cell(n, safe)?),
        MystNode::Caption(n) => one(DocNode::Caption(doc::Caption {
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::CaptionNumber(n) => one(DocNode::CaptionNumber(doc::CaptionNumber {
            kind: n.kind.clone(),
            label: n.label.clone(),
            identifier: n.identifier.clone(),
            html_id: n.html_id.clone(),
            enumerator: n.enumerator.clone(),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::Aside(n) => one(DocNode::Aside(doc::Aside {
            kind: n.kind.clone(),
            class: n.class.clone(),
            label: n.label.clone(),
            children: convert_children(&n.children, safe)?,
        })),
        MystNode::FootnoteDefinition(n) => {
            one(DocNode::FootnoteDefinition(doc::FootnoteDefinition {
                identifier: n.identifier.clone().unwrap_or_default(),
                children: convert_children(&n.children, safe)?,
            }))
        }
        MystNode::BlockBreak(n) => one(DocNode::BlockBreak(doc::BlockBreak {
            meta: n.meta.clone(),
        })),
        MystNode::Text(n) => one(DocNode::Text(doc::TextLeaf::plain(n.value.clone()))),
        MystNode::InlineCode(n) => one(DocNode::Text(doc::TextLeaf {
            text: n.value.clone(),
            marks: MarkSet::from_marks([Mark::Code]),
        })),
        MystNode::InlineMath(n) => one(DocNode::InlineMath(doc::InlineMathLeaf {
            value: n.value.clone(),
            marks: MarkSet::new(),
        })),
        MystNode::Image(n) => one(from_image(n)),
        MystNode::Break => one(DocNode::HardBreak(doc::HardBreak::default())),
        MystNode::Emphasis(n) => many(mark_children(&n.children, safe, &[Mark::Emphasis])?),
        MystNode::Strong(n) => many(mark_children(&n.children, safe, &[Mark::Strong])?),
        MystNode::Subscript(n) => many(mark_children(&n.children, safe, &[Mark::Subscript])?),
        MystNode::Superscript(n) => many(mark_children(&n.children, safe, &[Mark::Superscript])?),
        MystNode::Underline(n) => many(mark_children(&n.children, safe, &[Mark::Underline])?),
        MystNode::Delete(n) => many(mark_children(&n.children, safe, &[Mark::Strikethrough])?),
        MystNode::Link(n) => many(mark_children(
            &n.children,
            safe,
            &[Mark::Link {
                url: n.url.clone(),
                title: n.title.clone(),
            }],
        )?),
        MystNode::Unknown(n) => opaque::transform_unknown(n, safe),
    };
    Ok(converted)
}

fn one(node: DocNode) -> Converted {
    Converted::One(node)
}

fn many(nodes: Vec<DocNode>) -> Converted {
    Converted::Many(nodes)
}

/// Convert a child list, flattening mark handlers' fan-out.
fn convert_children(children: &[MystNode], safe: bool) -> Result<Vec<DocNode>, ConvertError> {
    let mut converted = Vec::with_capacity(children.len());
    for child in children {
        converted.extend(transform(child, safe)?.into_nodes());
    }
    Ok(converted)
}

/// Convert a child list and stamp every inline result with extra marks.
fn mark_children(
    children: &[MystNode],
    safe: bool,
    marks: &[Mark],
) -> Result<Vec<DocNode>, ConvertError> {
    let mut converted = convert_children(children, safe)?;
    for node in &mut converted {
        if let Some(set) = node.marks_mut() {
            for mark in marks {
                set.add(mark.clone());
            }
        }
    }
    Ok(converted)
}

fn from_list_item(item: &myst::ListItem, safe: bool) -> Result<DocNode, ConvertError> {
    let children = wrap_if_all_inline(convert_children(&item.children, safe)?);
    Ok(DocNode::ListItem(doc::ListItem {
        spread: item.spread.unwrap_or(false),
        children,
    }))
}

fn from_table_cell(cell: &myst::TableCell, safe: bool) -> Result<DocNode, ConvertError> {
    let children = wrap_if_all_inline(convert_children(&cell.children, safe)?);
    Ok(DocNode::TableCell(doc::TableCell {
        align: cell.align.clone(),
        header: cell.header.unwrap_or(false),
        children,
    }))
}

/// The grammar forbids inline content directly under a list item or table
/// cell, so an all-inline child list is wrapped in a synthetic paragraph.
fn wrap_if_all_inline(children: Vec<DocNode>) -> Vec<DocNode> {
    if children.iter().all(schema::is_inline) {
        vec![DocNode::Paragraph(doc::Paragraph { children })]
    } else {
        children
    }
}

fn from_directive(directive: &myst::Directive, safe: bool) -> Result<DocNode, ConvertError> {
    let children = if SUPPORTED_DIRECTIVES.contains(&directive.name.as_str()) {
        convert_children(&directive.children, safe)?
    } else {
        Vec::new()
    };
    Ok(DocNode::Directive(doc::Directive {
        name: directive.name.clone(),
        args: directive.args.clone().unwrap_or_default(),
        value: directive.value.clone().unwrap_or_default(),
        children,
    }))
}

fn from_code(code: &myst::Code) -> DocNode {
    DocNode::CodeBlock(doc::CodeBlock {
        lang: code
            .lang
            .clone()
            .unwrap_or_else(|| defaults::CODE_LANG.to_string()),
        meta: code.meta.clone(),
        class: code.class.clone().unwrap_or_default(),
        show_line_numbers: code.show_line_numbers.unwrap_or(false),
        emphasize_lines: code.emphasize_lines.clone().unwrap_or_default(),
        identifier: code.identifier.clone(),
        label: code.label.clone(),
        value: code.value.clone(),
    })
}

fn from_image(image: &myst::Image) -> DocNode {
    let leaf = DocNode::Image(doc::ImageLeaf {
        url: image.url.clone(),
        alt: image.alt.clone().unwrap_or_default(),
        title: image.title.clone().unwrap_or_default(),
        class: image.class.clone().unwrap_or_default(),
        width: image
            .width
            .clone()
            .unwrap_or_else(|| defaults::IMAGE_WIDTH.to_string()),
        align: image
            .align
            .clone()
            .unwrap_or_else(|| defaults::IMAGE_ALIGN.to_string()),
        marks: MarkSet::new(),
    });
    DocNode::ImageWrapper(doc::ImageWrapper {
        children: vec![leaf],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::to_doc;
    use serde_json::json;

    fn text(value: &str) -> MystNode {
        MystNode::Text(myst::Text {
            value: value.into(),
        })
    }

    fn paragraph(children: Vec<MystNode>) -> MystNode {
        MystNode::Paragraph(myst::Paragraph { children })
    }

    fn leaf_marks(node: &DocNode) -> Vec<&Mark> {
        node.marks().expect("inline leaf").iter().collect()
    }

    #[test]
    fn emphasis_dissolves_into_marked_leaves() {
        let ast = paragraph(vec![MystNode::Emphasis(myst::Emphasis {
            children: vec![text("soft")],
        })]);

        let converted = to_doc(&ast).unwrap();
        match &converted {
            DocNode::Paragraph(para) => {
                assert_eq!(para.children.len(), 1);
                assert_eq!(leaf_marks(&para.children[0]), vec![&Mark::Emphasis]);
            }
            other => panic!("expected paragraph, got {}", other.tag()),
        }
    }

    #[test]
    fn nested_wrappers_accumulate_marks() {
        // *one **two** three*
        let ast = paragraph(vec![MystNode::Emphasis(myst::Emphasis {
            children: vec![
                text("one "),
                MystNode::Strong(myst::Strong {
                    children: vec![text("two")],
                }),
                text(" three"),
            ],
        })]);

        let converted = to_doc(&ast).unwrap();
        let DocNode::Paragraph(para) = &converted else {
            panic!("expected paragraph");
        };
        assert_eq!(para.children.len(), 3);
        assert_eq!(leaf_marks(&para.children[0]), vec![&Mark::Emphasis]);
        assert_eq!(
            leaf_marks(&para.children[1]),
            vec![&Mark::Strong, &Mark::Emphasis]
        );
        assert_eq!(leaf_marks(&para.children[2]), vec![&Mark::Emphasis]);
    }

    #[test]
    fn inline_code_becomes_a_marked_text_leaf() {
        let ast = paragraph(vec![MystNode::InlineCode(myst::InlineCode {
            value: "let x".into(),
        })]);

        let converted = to_doc(&ast).unwrap();
        let DocNode::Paragraph(para) = &converted else {
            panic!("expected paragraph");
        };
        match &para.children[0] {
            DocNode::Text(leaf) => {
                assert_eq!(leaf.text, "let x");
                assert!(leaf.marks.contains(&Mark::Code));
            }
            other => panic!("expected text leaf, got {}", other.tag()),
        }
    }

    #[test]
    fn link_mark_carries_url_and_title() {
        let ast = paragraph(vec![MystNode::Link(myst::Link {
            url: "https://example.org".into(),
            title: Some("Example".into()),
            children: vec![text("here")],
        })]);

        let converted = to_doc(&ast).unwrap();
        let DocNode::Paragraph(para) = &converted else {
            panic!("expected paragraph");
        };
        assert_eq!(
            leaf_marks(&para.children[0]),
            vec![&Mark::Link {
                url: "https://example.org".into(),
                title: Some("Example".into()),
            }]
        );
    }

    #[test]
    fn list_item_wraps_inline_children_in_a_paragraph() {
        let ast = MystNode::ListItem(myst::ListItem {
            spread: None,
            children: vec![text("tight item")],
        });

        let Converted::One(DocNode::ListItem(item)) = transform(&ast, false).unwrap() else {
            panic!("expected a single list item");
        };
        assert_eq!(item.children.len(), 1);
        assert!(matches!(item.children[0], DocNode::Paragraph(_)));
    }

    #[test]
    fn list_item_keeps_flow_children_unwrapped() {
        let ast = MystNode::ListItem(myst::ListItem {
            spread: None,
            children: vec![paragraph(vec![text("loose item")])],
        });

        let Converted::One(DocNode::ListItem(item)) = transform(&ast, false).unwrap() else {
            panic!("expected a single list item");
        };
        assert_eq!(item.children.len(), 1);
        assert!(matches!(item.children[0], DocNode::Paragraph(_)));
    }

    #[test]
    fn table_cell_wraps_inline_children() {
        let ast = MystNode::TableCell(myst::TableCell {
            align: Some("center".into()),
            header: Some(true),
            children: vec![text("cell")],
        });

        let Converted::One(DocNode::TableCell(cell)) = transform(&ast, false).unwrap() else {
            panic!("expected a single cell");
        };
        assert_eq!(cell.align.as_deref(), Some("center"));
        assert!(cell.header);
        assert!(matches!(cell.children[0], DocNode::Paragraph(_)));
    }

    #[test]
    fn supported_directive_children_are_converted() {
        let ast = MystNode::Directive(myst::Directive {
            name: "note".into(),
            args: None,
            value: Some("A note.".into()),
            children: vec![paragraph(vec![text("A note.")])],
        });

        let Converted::One(DocNode::Directive(directive)) = transform(&ast, false).unwrap() else {
            panic!("expected a single directive");
        };
        assert_eq!(directive.children.len(), 1);
    }

    #[test]
    fn unsupported_directive_children_are_withheld() {
        let ast = MystNode::Directive(myst::Directive {
            name: "mermaid".into(),
            args: Some("flow".into()),
            value: Some("graph TD".into()),
            children: vec![paragraph(vec![text("rendered diagram")])],
        });

        let Converted::One(DocNode::Directive(directive)) = transform(&ast, false).unwrap() else {
            panic!("expected a single directive");
        };
        assert!(directive.children.is_empty());
        assert_eq!(directive.name, "mermaid");
        assert_eq!(directive.args, "flow");
        assert_eq!(directive.value, "graph TD");
    }

    #[test]
    fn image_is_wrapped() {
        let ast = MystNode::Image(myst::Image {
            url: "figure.png".into(),
            alt: Some("a figure".into()),
            title: None,
            class: None,
            width: None,
            align: None,
        });

        let Converted::One(DocNode::ImageWrapper(wrapper)) = transform(&ast, false).unwrap() else {
            panic!("expected an image wrapper");
        };
        match &wrapper.children[0] {
            DocNode::Image(image) => {
                assert_eq!(image.url, "figure.png");
                assert_eq!(image.alt, "a figure");
                assert_eq!(image.align, defaults::IMAGE_ALIGN);
                assert_eq!(image.width, defaults::IMAGE_WIDTH);
            }
            other => panic!("expected image leaf, got {}", other.tag()),
        }
    }

    #[test]
    fn target_label_is_normalized() {
        let ast = MystNode::Target(myst::Target {
            label: Some("  My-Label ".into()),
        });

        let Converted::One(DocNode::Target(target)) = transform(&ast, false).unwrap() else {
            panic!("expected a target");
        };
        assert_eq!(target.label, "my-label");
    }

    #[test]
    fn unknown_inline_node_survives_strict_mode() {
        // A childless unknown node is inline-safe, so no retry is needed.
        let ast = paragraph(vec![
            text("see "),
            MystNode::Unknown(myst::Opaque::new(json!({
                "type": "cite",
                "data": { "label": "smith2023" }
            }))),
        ]);

        let converted = to_doc(&ast).unwrap();
        let DocNode::Paragraph(para) = &converted else {
            panic!("expected paragraph");
        };
        assert!(matches!(
            leaf_marks(&para.children[1])[0],
            Mark::Unsupported { editable: true, .. }
        ));
    }

    #[test]
    fn unknown_block_in_inline_position_triggers_safe_retry() {
        // Strict mode renders the unknown node as an opaque block, which is
        // invalid inside a paragraph; the safe retry renders it inline.
        let ast = MystNode::Root(myst::Root {
            children: vec![paragraph(vec![
                text("before "),
                MystNode::Unknown(myst::Opaque::new(json!({
                    "type": "buttonRole",
                    "children": [{ "type": "text", "value": "click" }]
                }))),
            ])],
        });

        let converted = to_doc(&ast).unwrap();
        let DocNode::Root(root) = &converted else {
            panic!("expected root");
        };
        let DocNode::Paragraph(para) = &root.children[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&para.children[1], DocNode::Text(_)));
    }

    #[test]
    fn unknown_block_at_flow_position_stays_a_block() {
        let ast = MystNode::Root(myst::Root {
            children: vec![MystNode::Unknown(myst::Opaque::new(json!({
                "type": "exercise",
                "value": "try it",
                "children": [{ "type": "text", "value": "body" }]
            })))],
        });

        let converted = to_doc(&ast).unwrap();
        let DocNode::Root(root) = &converted else {
            panic!("expected root");
        };
        assert!(matches!(&root.children[0], DocNode::UnsupportedBlock(_)));
    }

    #[test]
    fn top_level_mark_node_is_an_invariant_violation() {
        let ast = MystNode::Emphasis(myst::Emphasis {
            children: vec![text("floating")],
        });

        assert!(matches!(to_doc(&ast), Err(ConvertError::Invariant(_))));
    }

    #[test]
    fn out_of_range_heading_level_is_fatal() {
        // Safe mode cannot repair attributes, so the second violation
        // propagates.
        let ast = MystNode::Root(myst::Root {
            children: vec![MystNode::Heading(myst::Heading {
                depth: 9,
                enumerated: None,
                enumerator: None,
                identifier: None,
                label: None,
                children: vec![text("too deep")],
            })],
        });

        assert!(matches!(to_doc(&ast), Err(ConvertError::Grammar(_))));
    }
}
