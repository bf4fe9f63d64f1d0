//! Error types for document conversion

use std::fmt;

/// A node whose shape was rejected by the content model.
///
/// Carries the tag of the offending node and a human-readable description of
/// what the content model expected.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarViolation {
    /// Tag of the rejected node
    pub node: String,
    /// What the content model expected versus what it found
    pub detail: String,
}

impl GrammarViolation {
    pub fn new(node: impl Into<String>, detail: impl Into<String>) -> Self {
        GrammarViolation {
            node: node.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for GrammarViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid content for '{}': {}", self.node, self.detail)
    }
}

impl std::error::Error for GrammarViolation {}

/// Errors that can occur while converting between the AST and the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The content model rejected the converted tree. Recovered once by a
    /// whole-tree safe-mode retry; a second rejection is returned to the
    /// caller.
    Grammar(GrammarViolation),
    /// A handler produced a result shape its caller cannot accept. This is a
    /// defect in the converter, never recovered.
    Invariant(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Grammar(violation) => write!(f, "{violation}"),
            ConvertError::Invariant(msg) => write!(f, "conversion invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}
