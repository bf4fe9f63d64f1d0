//! The content model consumed by both converters.
//!
//! One read-only table, keyed by document node tag, declares for every node
//! type its group membership, what its children must be, and the validators
//! and defaults for its attributes. The forward converter builds trees first
//! and asks the model afterwards; [`validate`] reports the first node whose
//! shape the model rejects so the converter can decide between a safe-mode
//! retry and giving up.
//!
//! The table is shared freely across calls; it holds no mutable state.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::doc::nodes::DocNode;
use crate::error::GrammarViolation;

/// Content-group membership of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// The document root; never valid as a child
    Top,
    /// Block-level flow content
    Flow,
    /// Items of a list
    ListContent,
    /// Rows of a table
    RowContent,
    /// Cells of a table row
    CellContent,
    /// Inline content
    Phrasing,
}

/// What a node type's children must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// No children allowed
    None,
    /// Zero or more phrasing children
    Inline,
    /// Zero or more flow children
    Flow,
    /// One or more list items
    Items,
    /// One or more table rows
    Rows,
    /// One or more table cells
    Cells,
    /// Flow children plus the wrapped image, for figure containers
    Figure,
    /// Exactly one inline image leaf
    SingleImage,
}

/// One row of the content-model table.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
    pub group: Group,
    pub content: Content,
}

/// Admonition kinds the model accepts.
pub const ADMONITION_KINDS: [&str; 10] = [
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "note",
    "seealso",
    "tip",
    "warning",
];

/// Container kinds the model accepts.
pub const CONTAINER_KINDS: [&str; 2] = ["figure", "table"];

/// Alignments the model accepts for images and table cells.
pub const ALIGNMENTS: [&str; 3] = ["left", "center", "right"];

/// Attribute defaults declared by the model.
pub mod defaults {
    pub const CODE_LANG: &str = "text";
    pub const ADMONITION_KIND: &str = "note";
    pub const CONTAINER_KIND: &str = "figure";
    pub const IMAGE_ALIGN: &str = "left";
    pub const IMAGE_WIDTH: &str = "100%";
    pub const LIST_START: u32 = 1;
}

static TABLE: Lazy<HashMap<&'static str, NodeSpec>> = Lazy::new(|| {
    fn spec(group: Group, content: Content) -> NodeSpec {
        NodeSpec { group, content }
    }

    let mut table = HashMap::new();
    table.insert("root", spec(Group::Top, Content::Flow));
    table.insert("block", spec(Group::Flow, Content::Flow));
    table.insert("blockBreak", spec(Group::Flow, Content::None));
    table.insert("paragraph", spec(Group::Flow, Content::Inline));
    table.insert("heading", spec(Group::Flow, Content::Inline));
    table.insert("thematicBreak", spec(Group::Flow, Content::None));
    table.insert("blockquote", spec(Group::Flow, Content::Flow));
    table.insert("list", spec(Group::Flow, Content::Items));
    table.insert("listItem", spec(Group::ListContent, Content::Flow));
    table.insert("code_block", spec(Group::Flow, Content::None));
    table.insert("html", spec(Group::Flow, Content::None));
    table.insert("definition", spec(Group::Flow, Content::None));
    table.insert("target", spec(Group::Flow, Content::None));
    table.insert("directive", spec(Group::Flow, Content::Flow));
    table.insert("admonition", spec(Group::Flow, Content::Flow));
    table.insert("admonitionTitle", spec(Group::Flow, Content::Inline));
    table.insert("container", spec(Group::Flow, Content::Figure));
    table.insert("math", spec(Group::Flow, Content::None));
    table.insert("table", spec(Group::Flow, Content::Rows));
    table.insert("table_row", spec(Group::RowContent, Content::Cells));
    table.insert("table_cell", spec(Group::CellContent, Content::Flow));
    table.insert("imageWrapper", spec(Group::Phrasing, Content::SingleImage));
    table.insert("caption", spec(Group::Flow, Content::Flow));
    table.insert("captionNumber", spec(Group::Phrasing, Content::Inline));
    table.insert("aside", spec(Group::Flow, Content::Flow));
    table.insert("footnoteDefinition", spec(Group::Flow, Content::Flow));
    table.insert("unsupported_block", spec(Group::Flow, Content::None));
    table.insert("text", spec(Group::Phrasing, Content::None));
    table.insert("image", spec(Group::Phrasing, Content::None));
    table.insert("inlineMath", spec(Group::Phrasing, Content::None));
    table.insert("break", spec(Group::Phrasing, Content::None));
    table
});

/// Look up the spec for a node tag.
pub fn node_spec(tag: &str) -> Option<&'static NodeSpec> {
    TABLE.get(tag)
}

/// The group a document node belongs to.
pub fn group_of(node: &DocNode) -> Group {
    // Every DocNode variant has a row in the table
    node_spec(node.tag()).map(|spec| spec.group).unwrap_or(Group::Flow)
}

/// Whether a node is inline content.
pub fn is_inline(node: &DocNode) -> bool {
    group_of(node) == Group::Phrasing
}

/// Check a whole tree against the content model.
///
/// Reports the first node whose children break its declared content or whose
/// attributes fail a validator.
pub fn validate(node: &DocNode) -> Result<(), GrammarViolation> {
    validate_attrs(node)?;
    validate_children(node)?;
    for child in node.children() {
        validate(child)?;
    }
    Ok(())
}

fn validate_children(node: &DocNode) -> Result<(), GrammarViolation> {
    let tag = node.tag();
    let spec = node_spec(tag)
        .ok_or_else(|| GrammarViolation::new(tag, "node type not in the content model"))?;
    let children = node.children();

    match spec.content {
        Content::None => {
            if !children.is_empty() {
                return Err(GrammarViolation::new(tag, "no children allowed"));
            }
        }
        Content::Inline => {
            require_group(tag, children, Group::Phrasing, "phrasing content")?;
        }
        Content::Flow => {
            require_group(tag, children, Group::Flow, "flow content")?;
        }
        Content::Items => {
            require_group(tag, children, Group::ListContent, "list items")?;
            if children.is_empty() {
                return Err(GrammarViolation::new(tag, "at least one list item required"));
            }
        }
        Content::Rows => {
            require_group(tag, children, Group::RowContent, "table rows")?;
            if children.is_empty() {
                return Err(GrammarViolation::new(tag, "at least one row required"));
            }
        }
        Content::Cells => {
            require_group(tag, children, Group::CellContent, "table cells")?;
            if children.is_empty() {
                return Err(GrammarViolation::new(tag, "at least one cell required"));
            }
        }
        Content::Figure => {
            for child in children {
                let allowed = group_of(child) == Group::Flow || child.tag() == "imageWrapper";
                if !allowed {
                    return Err(GrammarViolation::new(
                        tag,
                        format!("expected figure content, found '{}'", child.tag()),
                    ));
                }
            }
        }
        Content::SingleImage => {
            let is_single_image =
                children.len() == 1 && matches!(children[0], DocNode::Image(_));
            if !is_single_image {
                return Err(GrammarViolation::new(tag, "exactly one image required"));
            }
        }
    }
    Ok(())
}

fn require_group(
    tag: &str,
    children: &[DocNode],
    group: Group,
    expected: &str,
) -> Result<(), GrammarViolation> {
    for child in children {
        if group_of(child) != group {
            return Err(GrammarViolation::new(
                tag,
                format!("expected {expected}, found '{}'", child.tag()),
            ));
        }
    }
    Ok(())
}

fn validate_attrs(node: &DocNode) -> Result<(), GrammarViolation> {
    match node {
        DocNode::Heading(heading) => {
            if !(1..=6).contains(&heading.level) {
                return Err(GrammarViolation::new(
                    "heading",
                    format!("level {} outside 1..=6", heading.level),
                ));
            }
        }
        DocNode::Admonition(admonition) => {
            if !ADMONITION_KINDS.contains(&admonition.kind.as_str()) {
                return Err(GrammarViolation::new(
                    "admonition",
                    format!("unknown kind '{}'", admonition.kind),
                ));
            }
        }
        DocNode::Container(container) => {
            if !CONTAINER_KINDS.contains(&container.kind.as_str()) {
                return Err(GrammarViolation::new(
                    "container",
                    format!("unknown kind '{}'", container.kind),
                ));
            }
        }
        DocNode::Image(image) => {
            if !ALIGNMENTS.contains(&image.align.as_str()) {
                return Err(GrammarViolation::new(
                    "image",
                    format!("unknown alignment '{}'", image.align),
                ));
            }
        }
        DocNode::TableCell(cell) => {
            if let Some(align) = &cell.align {
                if !ALIGNMENTS.contains(&align.as_str()) {
                    return Err(GrammarViolation::new(
                        "table_cell",
                        format!("unknown alignment '{align}'"),
                    ));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
