//! Focus-relative layer assignment.

use crate::graph::GraphIndex;
use crate::model::{Layer, LayerAssignment, NodeId, RelationKind};
use std::collections::{BTreeMap, VecDeque};

/// Breadth-first depth assignment from `focus`.
///
/// The focus sits at depth 0; `next` neighbors go one layer down (`d - 1`), `prev` neighbors one
/// layer up (`d + 1`) and `parallel` neighbors stay at `d`. The first depth a node is dequeued
/// with is kept, so depths are BFS hop distances rather than longest or averaged paths.
/// Unreachable nodes do not appear in the result.
///
/// Within each layer nodes are ordered by descending degree; ties keep visit order.
pub fn assign_layers(focus: NodeId, index: &GraphIndex) -> LayerAssignment {
    let mut depth_of: Vec<Option<i32>> = vec![None; index.node_count().max(focus.index() + 1)];
    let mut visit_order: Vec<NodeId> = Vec::new();
    let mut queue: VecDeque<(NodeId, i32)> = VecDeque::new();
    queue.push_back((focus, 0));

    while let Some((node, depth)) = queue.pop_front() {
        if depth_of[node.index()].is_some() {
            continue;
        }
        depth_of[node.index()] = Some(depth);
        visit_order.push(node);

        let expansions = [
            (RelationKind::Next, depth - 1),
            (RelationKind::Prev, depth + 1),
            (RelationKind::Parallel, depth),
        ];
        for (kind, next_depth) in expansions {
            for &n in index.neighbors(node, kind) {
                if depth_of[n.index()].is_none() {
                    queue.push_back((n, next_depth));
                }
            }
        }
    }

    let mut by_depth: BTreeMap<i32, Vec<NodeId>> = BTreeMap::new();
    for node in visit_order {
        if let Some(depth) = depth_of[node.index()] {
            by_depth.entry(depth).or_default().push(node);
        }
    }

    let layers = by_depth
        .into_iter()
        .map(|(depth, mut nodes)| {
            // `sort_by_key` is stable, so equal degrees keep BFS visit order.
            nodes.sort_by_key(|&n| std::cmp::Reverse(index.degree(n)));
            Layer { depth, nodes }
        })
        .collect();

    LayerAssignment::new(layers)
}

/// Layer index of every node in `layers`, indexed by [`NodeId`]. `None` for nodes that are not
/// laid out.
pub fn layer_index_of(layers: &LayerAssignment, node_count: usize) -> Vec<Option<usize>> {
    let mut out = vec![None; node_count];
    for (li, layer) in layers.layers.iter().enumerate() {
        for &n in &layer.nodes {
            if let Some(slot) = out.get_mut(n.index()) {
                *slot = Some(li);
            }
        }
    }
    out
}
