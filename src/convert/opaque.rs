//! Fallback policy for unrecognized nodes, shared by both directions.
//!
//! Forward: an unknown node is rendered as visible text carrying its
//! original payload, either as an opaque block (when it has children and the
//! grammar allows a block there) or as a text leaf with an `unsupported`
//! mark. The `editable` flag records whether that text can be written back
//! into the payload on the way out.
//!
//! Backward: editable text is copied into the payload's `value` field and
//! the payload returned verbatim. Non-editable text is re-interpreted as a
//! serialized node; when that fails the stored original is returned and the
//! edit discarded, with a warning, never an error.

use serde_json::Value;

use crate::convert::Converted;
use crate::doc::marks::{Mark, MarkSet};
use crate::doc::nodes::{DocNode, TextLeaf, UnsupportedBlock};
use crate::myst::codec::{self, CodecError};
use crate::myst::nodes::{MystNode, Opaque};

/// Shown for unknown childless nodes that carry nothing we can display.
pub const PLACEHOLDER_TEXT: &str = "Directive not supported and no text content found";

/// Forward conversion of an unknown node.
///
/// In safe mode every unknown node takes the inline path; this is what makes
/// the safe-mode retry converge when an opaque block landed in an
/// inline-only position.
pub(crate) fn transform_unknown(node: &Opaque, safe: bool) -> Converted {
    tracing::debug!(
        tag = node.tag().unwrap_or("?"),
        "no handler for node type, using opaque fallback"
    );

    if safe || !node.has_children() {
        let (text, editable) = match node.data() {
            Some(data) => (pretty(data), true),
            None => (PLACEHOLDER_TEXT.to_string(), false),
        };
        let marks = MarkSet::from_marks([Mark::Unsupported {
            original: node.payload.clone(),
            editable,
        }]);
        Converted::One(DocNode::Text(TextLeaf { text, marks }))
    } else {
        let (text, editable) = match node.string_value() {
            Some(value) => (value.to_string(), true),
            None => (pretty(&node.payload), false),
        };
        Converted::One(DocNode::UnsupportedBlock(UnsupportedBlock {
            original: node.payload.clone(),
            editable,
            value: text,
        }))
    }
}

/// Backward conversion of opaque content, for both the `unsupported` mark
/// and the opaque block.
pub(crate) fn restore(original: &Value, editable: bool, text: &str) -> MystNode {
    if editable {
        let mut payload = original.clone();
        if let Value::Object(map) = &mut payload {
            map.insert("value".to_string(), Value::String(text.to_string()));
        }
        MystNode::Unknown(Opaque::new(payload))
    } else {
        match reinterpret(text) {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(
                    %err,
                    "could not reinterpret edited opaque content, reverting to the stored original"
                );
                MystNode::Unknown(Opaque::new(original.clone()))
            }
        }
    }
}

/// Parse edited text back into a serialized node.
fn reinterpret(text: &str) -> Result<MystNode, CodecError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| CodecError::Syntax(err.to_string()))?;
    codec::from_value(&value)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
