//! Path derivation from indentation.
//!
//! No tree is ever built. A line's parent is the closest addressable line
//! above it with a smaller indentation depth, and its path is the parent's
//! path plus its own key, or its position among the sequence entries that
//! share its depth under that parent.

use alloc::collections::BTreeMap;

use crate::line::LineKind;
use crate::row::Row;
use crate::ypath::{Segment, YamlPath};

/// What path derivation needs to know about an addressable line.
struct Node {
    depth: usize,
    kind: LineKind,
    key: String,
}

/// Build the `line number => path` mapping of `rows`.
///
/// Full-line and blank comments are neither indexed nor considered as
/// parents, so adding or removing them never changes another line's path.
pub(crate) fn build(rows: &[String], width: usize) -> BTreeMap<usize, YamlPath> {
    let nodes: Vec<Option<Node>> = rows
        .iter()
        .enumerate()
        .map(|(no, raw)| {
            let line = Row::classify(no, raw).into_addressable()?;
            Some(Node {
                depth: line.indent(width),
                kind: line.kind(),
                key: line.key().into_owned(),
            })
        })
        .collect();

    let mut index = BTreeMap::new();
    for (no, node) in nodes.iter().enumerate() {
        let Some(node) = node else {
            continue;
        };
        let parent = parent_of(&nodes, no, node.depth);
        let segment = match node.kind {
            LineKind::Sequence => Segment::Index(sequence_index(&nodes, parent, no, node.depth)),
            LineKind::Regular => Segment::Key(node.key.clone()),
        };
        // The parent sits above `no`, so its path is already known.
        let path = parent
            .and_then(|p| index.get(&p))
            .map_or_else(YamlPath::root, Clone::clone)
            .child(segment);
        index.insert(no, path);
    }
    index
}

/// Nearest addressable line above `no` that is shallower than `depth`.
fn parent_of(nodes: &[Option<Node>], no: usize, depth: usize) -> Option<usize> {
    if depth == 0 {
        return None;
    }
    nodes[..no]
        .iter()
        .rposition(|node| node.as_ref().is_some_and(|n| n.depth < depth))
}

/// Number of sequence entries at `depth` strictly between `parent` and `no`.
fn sequence_index(nodes: &[Option<Node>], parent: Option<usize>, no: usize, depth: usize) -> usize {
    let start = parent.map_or(0, |p| p + 1);
    nodes[start..no]
        .iter()
        .flatten()
        .filter(|n| n.depth == depth && n.kind == LineKind::Sequence)
        .count()
}
