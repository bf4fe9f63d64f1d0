//! Bidirectional conversion between MyST markdown ASTs and editor document trees
//!
//!     This crate sits between an external markdown parser and a structured
//!     text editor. The parser hands over an abstract syntax tree once per
//!     load; the editing surface works on a document tree whose shape is
//!     constrained by a content model; and on every save the (possibly
//!     edited) document tree is turned back into an AST for an external
//!     stringifier. Parser, editor and stringifier are collaborators with
//!     interfaces only; nothing here parses or prints markdown.
//!
//! Architecture
//!
//!     The two tree vocabularies live in their own modules and the
//!     converters between them in a third:
//!
//!     .
//!     ├── error.rs                # ConvertError / GrammarViolation
//!     ├── myst                    # AST side
//!     │   ├── nodes.rs            # closed node vocabulary + Unknown catch-all
//!     │   └── codec.rs            # JSON boundary (parser in, stringifier out)
//!     ├── doc                     # editor side
//!     │   ├── nodes.rs            # block nodes and inline leaves
//!     │   └── marks.rs            # value-typed marks, per-leaf mark sets
//!     ├── schema                  # the content model (consumed contract)
//!     └── convert
//!         ├── from_myst.rs        # forward conversion
//!         ├── to_myst.rs          # backward structural conversion
//!         ├── mark_spans.rs       # nested wrappers from flat mark sets
//!         └── opaque.rs           # fallback for unrecognized nodes
//!
//! Core Algorithm
//!
//!     The formats disagree in exactly one place: the AST nests formatting
//!     wrappers, the document tree flattens them into mark sets on leaves.
//!     Flattening is easy (stamp marks while recursing); the reverse needs a
//!     real algorithm, because overlapping mark ranges have to be resolved
//!     into one deterministic nesting. That algorithm, and the ordering
//!     rules that make it deterministic, live in convert/mark_spans.rs.
//!
//! Error Handling
//!
//!     Forward conversion validates against the content model and retries
//!     once in safe mode when the model rejects the tree; a second rejection
//!     surfaces as an error. Backward conversion never fails: edits to
//!     opaque content that cannot be re-interpreted are reverted to the
//!     stored original, with a warning. Shape mismatches between a handler
//!     and its caller are defects and propagate as invariant errors.
//!
//!     Both converters are pure functions over shared references; they build
//!     fresh trees and are safe to call concurrently from independent call
//!     sites.

pub mod convert;
pub mod doc;
pub mod error;
pub mod myst;
pub mod schema;

pub use doc::marks::{Mark, MarkSet};
pub use doc::nodes::DocNode;
pub use error::{ConvertError, GrammarViolation};
pub use myst::nodes::MystNode;

/// Convert a parsed MyST AST into an editor document tree.
///
/// Runs strict first and retries once in safe mode if the content model
/// rejects the result. Invoked once per document load.
pub fn to_doc(ast: &MystNode) -> Result<DocNode, ConvertError> {
    convert::to_doc(ast)
}

/// Convert an editor document tree back into a MyST AST.
///
/// Total over all document nodes; invoked once per save or export.
pub fn from_doc(doc: &DocNode) -> MystNode {
    convert::from_doc(doc)
}
