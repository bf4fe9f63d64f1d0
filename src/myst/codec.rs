//! JSON boundary for the MyST AST.
//!
//! The external parser and stringifier exchange trees as tagged JSON objects
//! (`{"type": "paragraph", "children": [...]}`). This module maps that shape
//! onto [`MystNode`] in both directions. Decoding is total: tags without a
//! handler become [`MystNode::Unknown`], carrying the object verbatim so it
//! can later be re-emitted or re-interpreted unchanged.
//!
//! Fields the vocabulary does not declare (source positions, parser-internal
//! keys) are ignored and lost on decode, the usual cost of moving into a
//! semantic representation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::nodes::{MystNode, Opaque};

/// Errors produced by the JSON boundary
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The value is not valid JSON at all
    Syntax(String),
    /// The object has no `type` tag
    MissingType,
    /// A known tag's attributes did not match its declared shape
    Shape { tag: String, detail: String },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Syntax(detail) => write!(f, "invalid JSON: {detail}"),
            CodecError::MissingType => write!(f, "node object has no 'type' tag"),
            CodecError::Shape { tag, detail } => {
                write!(f, "malformed '{tag}' node: {detail}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Decode a JSON value into a [`MystNode`].
///
/// Known tags decode into their fixed shapes; anything else is wrapped as
/// [`MystNode::Unknown`] with the full object as its payload.
pub fn from_value(value: &Value) -> Result<MystNode, CodecError> {
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingType)?;

    Ok(match tag {
        "root" => MystNode::Root(decode(tag, value)?),
        "block" => MystNode::Block(decode(tag, value)?),
        "paragraph" => MystNode::Paragraph(decode(tag, value)?),
        "heading" => MystNode::Heading(decode(tag, value)?),
        "thematicBreak" => MystNode::ThematicBreak,
        "blockquote" => MystNode::Blockquote(decode(tag, value)?),
        "list" => MystNode::List(decode(tag, value)?),
        "listItem" => MystNode::ListItem(decode(tag, value)?),
        "code" => MystNode::Code(decode(tag, value)?),
        "html" => MystNode::Html(decode(tag, value)?),
        "definition" => MystNode::Definition(decode(tag, value)?),
        "mystTarget" => MystNode::Target(decode(tag, value)?),
        "mystDirective" => MystNode::Directive(decode(tag, value)?),
        "admonition" => MystNode::Admonition(decode(tag, value)?),
        "admonitionTitle" => MystNode::AdmonitionTitle(decode(tag, value)?),
        "container" => MystNode::Container(decode(tag, value)?),
        "math" => MystNode::Math(decode(tag, value)?),
        "table" => MystNode::Table(decode(tag, value)?),
        "tableRow" => MystNode::TableRow(decode(tag, value)?),
        "tableCell" => MystNode::TableCell(decode(tag, value)?),
        "caption" => MystNode::Caption(decode(tag, value)?),
        "captionNumber" => MystNode::CaptionNumber(decode(tag, value)?),
        "aside" => MystNode::Aside(decode(tag, value)?),
        "footnoteDefinition" => MystNode::FootnoteDefinition(decode(tag, value)?),
        "blockBreak" => MystNode::BlockBreak(decode(tag, value)?),
        "text" => MystNode::Text(decode(tag, value)?),
        "emphasis" => MystNode::Emphasis(decode(tag, value)?),
        "strong" => MystNode::Strong(decode(tag, value)?),
        "link" => MystNode::Link(decode(tag, value)?),
        "subscript" => MystNode::Subscript(decode(tag, value)?),
        "superscript" => MystNode::Superscript(decode(tag, value)?),
        "underline" => MystNode::Underline(decode(tag, value)?),
        "delete" => MystNode::Delete(decode(tag, value)?),
        "inlineCode" => MystNode::InlineCode(decode(tag, value)?),
        "inlineMath" => MystNode::InlineMath(decode(tag, value)?),
        "image" => MystNode::Image(decode(tag, value)?),
        "break" => MystNode::Break,
        _ => MystNode::Unknown(Opaque::new(value.clone())),
    })
}

/// Encode a [`MystNode`] as the tagged JSON object the stringifier expects.
///
/// [`MystNode::Unknown`] re-emits its payload verbatim.
pub fn to_value(node: &MystNode) -> Result<Value, CodecError> {
    match node {
        MystNode::Root(n) => tagged("root", n),
        MystNode::Block(n) => tagged("block", n),
        MystNode::Paragraph(n) => tagged("paragraph", n),
        MystNode::Heading(n) => tagged("heading", n),
        MystNode::ThematicBreak => Ok(unit("thematicBreak")),
        MystNode::Blockquote(n) => tagged("blockquote", n),
        MystNode::List(n) => tagged("list", n),
        MystNode::ListItem(n) => tagged("listItem", n),
        MystNode::Code(n) => tagged("code", n),
        MystNode::Html(n) => tagged("html", n),
        MystNode::Definition(n) => tagged("definition", n),
        MystNode::Target(n) => tagged("mystTarget", n),
        MystNode::Directive(n) => tagged("mystDirective", n),
        MystNode::Admonition(n) => tagged("admonition", n),
        MystNode::AdmonitionTitle(n) => tagged("admonitionTitle", n),
        MystNode::Container(n) => tagged("container", n),
        MystNode::Math(n) => tagged("math", n),
        MystNode::Table(n) => tagged("table", n),
        MystNode::TableRow(n) => tagged("tableRow", n),
        MystNode::TableCell(n) => tagged("tableCell", n),
        MystNode::Caption(n) => tagged("caption", n),
        MystNode::CaptionNumber(n) => tagged("captionNumber", n),
        MystNode::Aside(n) => tagged("aside", n),
        MystNode::FootnoteDefinition(n) => tagged("footnoteDefinition", n),
        MystNode::BlockBreak(n) => tagged("blockBreak", n),
        MystNode::Text(n) => tagged("text", n),
        MystNode::Emphasis(n) => tagged("emphasis", n),
        MystNode::Strong(n) => tagged("strong", n),
        MystNode::Link(n) => tagged("link", n),
        MystNode::Subscript(n) => tagged("subscript", n),
        MystNode::Superscript(n) => tagged("superscript", n),
        MystNode::Underline(n) => tagged("underline", n),
        MystNode::Delete(n) => tagged("delete", n),
        MystNode::InlineCode(n) => tagged("inlineCode", n),
        MystNode::InlineMath(n) => tagged("inlineMath", n),
        MystNode::Image(n) => tagged("image", n),
        MystNode::Break => Ok(unit("break")),
        MystNode::Unknown(opaque) => Ok(opaque.payload.clone()),
    }
}

fn decode<T: DeserializeOwned>(tag: &str, value: &Value) -> Result<T, CodecError> {
    serde_json::from_value(value.clone()).map_err(|err| CodecError::Shape {
        tag: tag.to_string(),
        detail: err.to_string(),
    })
}

fn tagged<T: Serialize>(tag: &str, attrs: &T) -> Result<Value, CodecError> {
    let mut value = serde_json::to_value(attrs).map_err(|err| CodecError::Shape {
        tag: tag.to_string(),
        detail: err.to_string(),
    })?;
    if let Value::Object(map) = &mut value {
        map.insert("type".to_string(), Value::String(tag.to_string()));
    }
    Ok(value)
}

fn unit(tag: &str) -> Value {
    serde_json::json!({ "type": tag })
}

impl Serialize for MystNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_value(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MystNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::myst::nodes as myst;
    use serde_json::json;

    #[test]
    fn decodes_known_tags() {
        let value = json!({
            "type": "paragraph",
            "children": [
                { "type": "text", "value": "hello" },
                { "type": "strong", "children": [{ "type": "text", "value": "world" }] }
            ]
        });

        let node = from_value(&value).unwrap();
        match node {
            MystNode::Paragraph(para) => {
                assert_eq!(para.children.len(), 2);
                assert!(matches!(&para.children[1], MystNode::Strong(_)));
            }
            other => panic!("expected paragraph, got {}", other.tag()),
        }
    }

    #[test]
    fn unknown_tag_becomes_opaque() {
        let value = json!({ "type": "cite", "label": "smith2023" });

        let node = from_value(&value).unwrap();
        match &node {
            MystNode::Unknown(opaque) => {
                assert_eq!(opaque.tag(), Some("cite"));
                assert_eq!(opaque.payload, value);
            }
            other => panic!("expected unknown node, got {}", other.tag()),
        }

        // Re-encoding emits the payload verbatim
        assert_eq!(to_value(&node).unwrap(), value);
    }

    #[test]
    fn missing_type_tag_is_an_error() {
        let value = json!({ "children": [] });
        assert_eq!(from_value(&value), Err(CodecError::MissingType));

        let value = json!(42);
        assert_eq!(from_value(&value), Err(CodecError::MissingType));
    }

    #[test]
    fn ignores_undeclared_fields() {
        let value = json!({
            "type": "text",
            "value": "hi",
            "position": { "start": { "line": 1 }, "end": { "line": 1 } }
        });

        let node = from_value(&value).unwrap();
        assert_eq!(node, MystNode::Text(myst::Text { value: "hi".into() }));
    }

    #[test]
    fn round_trips_a_nested_tree() {
        let value = json!({
            "type": "root",
            "children": [
                {
                    "type": "heading",
                    "depth": 2,
                    "children": [{ "type": "text", "value": "Title" }]
                },
                {
                    "type": "list",
                    "ordered": true,
                    "start": 3,
                    "children": [
                        {
                            "type": "listItem",
                            "children": [{ "type": "text", "value": "item" }]
                        }
                    ]
                },
                { "type": "thematicBreak" }
            ]
        });

        let node = from_value(&value).unwrap();
        assert_eq!(to_value(&node).unwrap(), value);
    }

    #[test]
    fn optional_attributes_are_omitted_when_absent() {
        let node = MystNode::Heading(myst::Heading {
            depth: 1,
            enumerated: None,
            enumerator: None,
            identifier: None,
            label: None,
            children: vec![],
        });

        let value = to_value(&node).unwrap();
        assert_eq!(value, json!({ "type": "heading", "depth": 1, "children": [] }));
    }
}
