//! Rebuilds nested inline wrappers from flat mark sets.
//!
//! # The High-Level Concept
//!
//! The document tree stores formatting as an unordered set of marks on each
//! inline leaf, so two marks can cover partially overlapping leaf ranges.
//! The AST cannot express that: there a mark is a wrapper node and wrappers
//! must nest. This module turns the flat leaf sequence of one
//! phrasing container back into a properly nested wrapper tree, picking one
//! valid nesting deterministically when ranges cross.
//!
//! # The Algorithm
//!
//! 1. **Group:** collect the sorted leaf positions carrying each distinct
//!    mark value. Marks compare by value, never by identity.
//!
//! 2. **Span:** split each mark's positions into maximal contiguous runs. A
//!    run breaks on a position gap, or when the leaf before a gap does not
//!    itself carry an equal mark (guards against equal marks that are
//!    deliberately discontinuous). Each span records its mark, first and
//!    last position, and length (`last - first`).
//!
//! 3. **Index:** build `opens[i]` and `closes[i]`, the spans starting and
//!    ending at each position.
//!
//! 4. **Order:** where several spans open at one position, longer spans open
//!    first (outermost); where several close, shorter spans close first
//!    (innermost). Equal lengths fall back to the marks' canonical keys, so
//!    the result never depends on the iteration order of a leaf's mark set.
//!
//! 5. **Sweep:** walk positions left to right with an explicit stack of
//!    children accumulators, seeded with one root accumulator. Opening a
//!    span pushes an empty accumulator; the leaf's AST node goes into the
//!    top one; closing a span pops the top accumulator, wraps its contents
//!    with the mark's constructor, and appends the wrapper to the new top.
//!
//! The root accumulator ends up holding the phrasing content sequence.
//!
//! Crossing spans get *a* nesting, not a faithful one: whichever span closes
//! first takes the accumulator opened last, so a mark can end up wrapping
//! leaves it never covered. Likewise, nested wrappers of the same mark value
//! collapse into one span on the way into the document tree and come back as
//! a single wrapper. Both behaviors are pinned by tests below rather than
//! corrected here.

use crate::convert::{opaque, to_myst};
use crate::doc::marks::Mark;
use crate::doc::nodes::DocNode;
use crate::myst::nodes as myst;
use crate::myst::nodes::MystNode;

/// A maximal contiguous run of leaf positions carrying one mark value.
#[derive(Debug, Clone)]
struct Span {
    mark: Mark,
    first: usize,
    last: usize,
    length: usize,
}

/// Reconstruct the nested AST phrasing content for one leaf sequence.
pub(crate) fn reconstruct(tokens: &[DocNode]) -> Vec<MystNode> {
    let spans = collect_spans(tokens);

    let mut opens: Vec<Vec<Span>> = vec![Vec::new(); tokens.len()];
    let mut closes: Vec<Vec<Span>> = vec![Vec::new(); tokens.len()];
    for span in spans {
        opens[span.first].push(span.clone());
        closes[span.last].push(span);
    }
    for list in &mut opens {
        list.sort_by(|a, b| {
            b.length
                .cmp(&a.length)
                .then_with(|| a.mark.canonical_key().cmp(&b.mark.canonical_key()))
        });
    }
    for list in &mut closes {
        list.sort_by(|a, b| {
            a.length
                .cmp(&b.length)
                .then_with(|| b.mark.canonical_key().cmp(&a.mark.canonical_key()))
        });
    }

    let mut stack: Vec<Vec<MystNode>> = vec![Vec::new()];
    for (i, token) in tokens.iter().enumerate() {
        for _ in &opens[i] {
            stack.push(Vec::new());
        }

        let leaf = leaf_node(token);
        stack
            .last_mut()
            .expect("accumulator stack is seeded with a root")
            .push(leaf);

        for span in &closes[i] {
            let children = stack
                .pop()
                .expect("span closes are balanced by span opens");
            let wrapped = wrap_mark(&span.mark, children);
            stack
                .last_mut()
                .expect("root accumulator is never popped")
                .push(wrapped);
        }
    }

    stack.pop().unwrap_or_default()
}

/// Derive the spans for a leaf sequence.
fn collect_spans(tokens: &[DocNode]) -> Vec<Span> {
    // Positions per distinct mark value, in order of first appearance. The
    // grouping order does not affect the result; only span length and the
    // canonical key do.
    let mut groups: Vec<(Mark, Vec<usize>)> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let Some(marks) = token.marks() else { continue };
        for mark in marks.iter() {
            match groups.iter_mut().find(|(existing, _)| existing == mark) {
                Some((_, positions)) => positions.push(i),
                None => groups.push((mark.clone(), vec![i])),
            }
        }
    }

    let mut spans = Vec::new();
    for (mark, positions) in &groups {
        let mut run_start = positions[0];
        let mut prev = positions[0];
        for &current in &positions[1..] {
            let gap = current != prev + 1;
            let separated = !tokens[prev]
                .marks()
                .map_or(false, |set| set.contains(mark));
            if gap || separated {
                spans.push(Span {
                    mark: mark.clone(),
                    first: run_start,
                    last: prev,
                    length: prev - run_start,
                });
                run_start = current;
            }
            prev = current;
        }
        spans.push(Span {
            mark: mark.clone(),
            first: run_start,
            last: prev,
            length: prev - run_start,
        });
    }
    spans
}

/// Emit the AST node for one leaf, marks excluded.
fn leaf_node(token: &DocNode) -> MystNode {
    match token {
        DocNode::Text(leaf) => MystNode::Text(myst::Text {
            value: leaf.text.clone(),
        }),
        other => to_myst::from_doc_node(other),
    }
}

/// Apply a mark's constructor rule to the children it wraps.
fn wrap_mark(mark: &Mark, children: Vec<MystNode>) -> MystNode {
    match mark {
        Mark::Emphasis => MystNode::Emphasis(myst::Emphasis { children }),
        Mark::Strong => MystNode::Strong(myst::Strong { children }),
        Mark::Subscript => MystNode::Subscript(myst::Subscript { children }),
        Mark::Superscript => MystNode::Superscript(myst::Superscript { children }),
        Mark::Underline => MystNode::Underline(myst::Underline { children }),
        Mark::Strikethrough => MystNode::Delete(myst::Delete { children }),
        Mark::Link { url, title } => MystNode::Link(myst::Link {
            url: url.clone(),
            title: title.clone(),
            children,
        }),
        // Inline code keeps no nested structure; the wrapped text collapses
        // into a single literal.
        Mark::Code => MystNode::InlineCode(myst::InlineCode {
            value: collapse_text(&children),
        }),
        Mark::Unsupported { original, editable } => {
            opaque::restore(original, *editable, &collapse_text(&children))
        }
    }
}

fn collapse_text(children: &[MystNode]) -> String {
    children
        .iter()
        .filter_map(|child| match child {
            MystNode::Text(text) => Some(text.value.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::marks::MarkSet;
    use crate::doc::nodes as doc;
    use serde_json::json;

    fn leaf(text: &str, marks: impl IntoIterator<Item = Mark>) -> DocNode {
        DocNode::Text(doc::TextLeaf {
            text: text.into(),
            marks: MarkSet::from_marks(marks),
        })
    }

    fn text(value: &str) -> MystNode {
        MystNode::Text(myst::Text {
            value: value.into(),
        })
    }

    #[test]
    fn unmarked_leaves_pass_through() {
        let tokens = vec![leaf("plain", [])];
        assert_eq!(reconstruct(&tokens), vec![text("plain")]);
    }

    #[test]
    fn single_mark_becomes_one_wrapper() {
        // **bold**
        let tokens = vec![leaf("bold", [Mark::Strong])];
        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Strong(myst::Strong {
                children: vec![text("bold")]
            })]
        );
    }

    #[test]
    fn nested_non_crossing_marks_nest_by_length() {
        // *one **two three** four*
        let tokens = vec![
            leaf("one ", [Mark::Emphasis]),
            leaf("two three", [Mark::Strong, Mark::Emphasis]),
            leaf(" four", [Mark::Emphasis]),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Emphasis(myst::Emphasis {
                children: vec![
                    text("one "),
                    MystNode::Strong(myst::Strong {
                        children: vec![text("two three")]
                    }),
                    text(" four"),
                ]
            })]
        );
    }

    #[test]
    fn discontinuous_equal_marks_become_separate_spans() {
        let tokens = vec![
            leaf("a", [Mark::Strong]),
            leaf(" and ", []),
            leaf("b", [Mark::Strong]),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![
                MystNode::Strong(myst::Strong {
                    children: vec![text("a")]
                }),
                text(" and "),
                MystNode::Strong(myst::Strong {
                    children: vec![text("b")]
                }),
            ]
        );
    }

    #[test]
    fn crossing_spans_resolve_deterministically() {
        // emphasis covers the first two leaves, strong the last two; no
        // faithful nesting exists, so the sweep's resolution is pinned.
        let tokens = vec![
            leaf("a", [Mark::Emphasis]),
            leaf("b", [Mark::Emphasis, Mark::Strong]),
            leaf("c", [Mark::Strong]),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Strong(myst::Strong {
                children: vec![
                    text("a"),
                    MystNode::Emphasis(myst::Emphasis {
                        children: vec![text("b")]
                    }),
                    text("c"),
                ]
            })]
        );
    }

    #[test]
    fn ambiguous_triple_nesting_is_pinned() {
        // *one **two *three*** four*: the inner emphasis around "three"
        // merges into the outer emphasis span on the way into the document
        // tree, so it cannot be reconstructed. This pins the current (lossy)
        // output so any change in behavior is visible.
        let tokens = vec![
            leaf("one ", [Mark::Emphasis]),
            leaf("two ", [Mark::Strong, Mark::Emphasis]),
            leaf("three", [Mark::Emphasis, Mark::Strong]),
            leaf(" four", [Mark::Emphasis]),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Emphasis(myst::Emphasis {
                children: vec![
                    text("one "),
                    MystNode::Strong(myst::Strong {
                        children: vec![text("two "), text("three")]
                    }),
                    text(" four"),
                ]
            })]
        );
    }

    #[test]
    fn equal_length_spans_order_by_canonical_key() {
        let tokens = vec![leaf("x", [Mark::Strong, Mark::Emphasis])];

        // emphasis sorts before strong, so it opens first and closes last.
        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Emphasis(myst::Emphasis {
                children: vec![MystNode::Strong(myst::Strong {
                    children: vec![text("x")]
                })]
            })]
        );
    }

    #[test]
    fn code_mark_collapses_wrapped_text() {
        let tokens = vec![
            leaf("let ", [Mark::Code]),
            leaf("x", [Mark::Code]),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::InlineCode(myst::InlineCode {
                value: "let x".into()
            })]
        );
    }

    #[test]
    fn link_mark_rebuilds_url_and_title() {
        let mark = Mark::Link {
            url: "https://example.org".into(),
            title: Some("Example".into()),
        };
        let tokens = vec![leaf("here", [mark])];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Link(myst::Link {
                url: "https://example.org".into(),
                title: Some("Example".into()),
                children: vec![text("here")]
            })]
        );
    }

    #[test]
    fn links_with_different_urls_are_distinct_marks() {
        let first = Mark::Link {
            url: "https://a.example".into(),
            title: None,
        };
        let second = Mark::Link {
            url: "https://b.example".into(),
            title: None,
        };
        let tokens = vec![leaf("a", [first]), leaf("b", [second])];

        let result = reconstruct(&tokens);
        assert_eq!(result.len(), 2);
        assert!(matches!(&result[0], MystNode::Link(link) if link.url == "https://a.example"));
        assert!(matches!(&result[1], MystNode::Link(link) if link.url == "https://b.example"));
    }

    #[test]
    fn inline_atoms_sit_inside_spans() {
        let tokens = vec![
            leaf("see ", [Mark::Emphasis]),
            DocNode::InlineMath(doc::InlineMathLeaf {
                value: "x^2".into(),
                marks: MarkSet::from_marks([Mark::Emphasis]),
            }),
        ];

        assert_eq!(
            reconstruct(&tokens),
            vec![MystNode::Emphasis(myst::Emphasis {
                children: vec![
                    text("see "),
                    MystNode::InlineMath(myst::InlineMath { value: "x^2".into() }),
                ]
            })]
        );
    }

    #[test]
    fn unsupported_mark_restores_the_payload() {
        let payload = json!({ "type": "cite", "data": { "label": "doe2020" } });
        let mark = Mark::Unsupported {
            original: payload.clone(),
            editable: true,
        };
        let tokens = vec![leaf("{ \"label\": \"doe2020\" }", [mark])];

        let result = reconstruct(&tokens);
        match &result[0] {
            MystNode::Unknown(opaque) => {
                assert_eq!(opaque.tag(), Some("cite"));
                assert_eq!(opaque.string_value(), Some("{ \"label\": \"doe2020\" }"));
            }
            other => panic!("expected opaque node, got {}", other.tag()),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(reconstruct(&[]), Vec::<MystNode>::new());
    }
}
