//! Formatting marks attached to inline leaves.
//!
//! A [`Mark`] is a plain value: two marks are the same mark exactly when
//! their tags and attributes are equal. Nothing in the crate may rely on
//! identity or allocation order to tell marks apart, because span grouping
//! during backward conversion is driven entirely by value equality.

use serde_json::Value;

/// A formatting attribute on an inline leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Emphasis,
    Strong,
    Subscript,
    Superscript,
    Underline,
    Strikethrough,
    Code,
    Link {
        url: String,
        title: Option<String>,
    },
    /// Wraps a leaf that stands in for an unrecognized inline node. The
    /// original node is kept as an inert serialized payload so backward
    /// conversion can restore or re-interpret it.
    Unsupported {
        original: Value,
        editable: bool,
    },
}

impl Mark {
    pub fn tag(&self) -> &'static str {
        match self {
            Mark::Emphasis => "emphasis",
            Mark::Strong => "strong",
            Mark::Subscript => "subscript",
            Mark::Superscript => "superscript",
            Mark::Underline => "underline",
            Mark::Strikethrough => "strikethrough",
            Mark::Code => "code",
            Mark::Link { .. } => "link",
            Mark::Unsupported { .. } => "unsupported",
        }
    }

    /// A total ordering key over mark values.
    ///
    /// Used only to order spans of equal length that open or close at the
    /// same leaf position; span length stays the primary determinant of
    /// nesting. Serialized attribute text keeps the key stable across runs
    /// because object keys serialize in sorted order.
    pub(crate) fn canonical_key(&self) -> String {
        match self {
            Mark::Link { url, title } => {
                format!("link\u{1f}{url}\u{1f}{}", title.as_deref().unwrap_or(""))
            }
            Mark::Unsupported { original, editable } => {
                format!("unsupported\u{1f}{editable}\u{1f}{original}")
            }
            other => other.tag().to_string(),
        }
    }
}

/// The set of marks carried by one inline leaf.
///
/// Insertion-ordered internally, but a set in every observable way: adding a
/// mark that is already present is a no-op, and equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
}

impl MarkSet {
    pub fn new() -> Self {
        MarkSet { marks: Vec::new() }
    }

    pub fn from_marks(marks: impl IntoIterator<Item = Mark>) -> Self {
        let mut set = MarkSet::new();
        for mark in marks {
            set.add(mark);
        }
        set
    }

    /// Add a mark unless an equal one is already present.
    pub fn add(&mut self, mark: Mark) {
        if !self.contains(&mark) {
            self.marks.push(mark);
        }
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.marks.iter().any(|existing| existing == mark)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl PartialEq for MarkSet {
    fn eq(&self, other: &Self) -> bool {
        self.marks.len() == other.marks.len()
            && self.marks.iter().all(|mark| other.contains(mark))
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        MarkSet::from_marks(iter)
    }
}
