//! The editor side of the conversion: document tree nodes and marks.

pub mod marks;
pub mod nodes;

pub use marks::{Mark, MarkSet};
pub use nodes::DocNode;
