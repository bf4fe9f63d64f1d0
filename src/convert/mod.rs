//! Conversion entry points.
//!
//! Forward conversion is a two-phase call: a strict pass first, and if the
//! content model rejects the resulting tree, one whole-tree retry in safe
//! mode. Safe mode only changes how unrecognized nodes with children are
//! rendered (inline opaque text instead of an opaque block), which is the
//! one place the strict pass can produce grammar-invalid output. A second
//! rejection is returned to the caller.
//!
//! Backward conversion is total: every failure mode it has is recovered
//! locally by the opaque fallback policy.

pub mod from_myst;
pub mod mark_spans;
pub mod opaque;
pub mod to_myst;

use crate::doc::nodes::DocNode;
use crate::error::ConvertError;
use crate::myst::nodes::MystNode;
use crate::schema;

/// Result of converting one AST node: most handlers produce a single node,
/// mark handlers dissolve into their (stamped) children.
#[derive(Debug)]
pub enum Converted {
    One(DocNode),
    Many(Vec<DocNode>),
}

impl Converted {
    pub fn into_nodes(self) -> Vec<DocNode> {
        match self {
            Converted::One(node) => vec![node],
            Converted::Many(nodes) => nodes,
        }
    }
}

/// Convert a MyST AST into a document tree.
///
/// Runs strict, retries once in safe mode on a grammar violation. Invariant
/// violations are defects and propagate from either pass.
pub fn to_doc(ast: &MystNode) -> Result<DocNode, ConvertError> {
    match convert(ast, false) {
        Ok(doc) => Ok(doc),
        Err(ConvertError::Grammar(violation)) => {
            tracing::debug!(%violation, "strict conversion rejected, retrying in safe mode");
            convert(ast, true)
        }
        Err(other) => Err(other),
    }
}

/// Convert a document tree back into a MyST AST.
pub fn from_doc(doc: &DocNode) -> MystNode {
    to_myst::from_doc_node(doc)
}

fn convert(ast: &MystNode, safe: bool) -> Result<DocNode, ConvertError> {
    let doc = match from_myst::transform(ast, safe)? {
        Converted::One(node) => node,
        Converted::Many(_) => {
            return Err(ConvertError::Invariant(
                "top-level conversion produced a node list".to_string(),
            ));
        }
    };
    schema::validate(&doc).map_err(ConvertError::Grammar)?;
    Ok(doc)
}
