//! The MyST side of the conversion: AST node vocabulary and JSON boundary.

pub mod codec;
pub mod nodes;

pub use codec::{from_value, to_value, CodecError};
pub use nodes::MystNode;
