//! Adjacency index over a flat relation list.
//!
//! Node ids are interned into a dense arena so the layering and crossing passes can use plain
//! vectors indexed by [`NodeId`] instead of string-keyed maps.

use crate::model::{NodeId, Relation, RelationKind};
use rustc_hash::{FxHashMap, FxHashSet};

/// A relation resolved to node handles, as used for crossing counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    names: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    /// Per node: `[prev, next, parallel]` neighbors, deduplicated, in first-insertion order.
    adjacency: Vec<[Vec<NodeId>; 3]>,
    edges: Vec<Edge>,
}

impl GraphIndex {
    /// Builds the index for one layout pass.
    ///
    /// Every relation registers both endpoints. A `next` relation A→B records B in A's `next`
    /// list and A in B's `prev` list (and the other way round for `prev`); `parallel` is
    /// recorded on both sides. Duplicate relations collapse in the adjacency lists.
    ///
    /// The edge list used for crossing counts keeps duplicated `prev`/`next` relations, but a
    /// `parallel` pair is kept once regardless of direction. Self-loops of any kind are left out
    /// of it: they still register the node and its adjacency entry, but a node never crosses
    /// anything on account of a relation to itself.
    pub fn build(relations: &[Relation]) -> Self {
        let mut index = Self::default();
        let mut linked: FxHashSet<(NodeId, NodeId, RelationKind)> = FxHashSet::default();
        let mut parallel_pairs: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();

        for rel in relations {
            let from = index.ensure_node(&rel.from);
            let to = index.ensure_node(&rel.to);

            if linked.insert((from, to, rel.kind)) {
                index.adjacency[from.index()][rel.kind.slot()].push(to);
            }
            let inverse = rel.kind.inverse();
            if linked.insert((to, from, inverse)) {
                index.adjacency[to.index()][inverse.slot()].push(from);
            }

            if from == to {
                continue;
            }
            if rel.kind == RelationKind::Parallel
                && !parallel_pairs.insert((from.min(to), from.max(to)))
            {
                continue;
            }
            index.edges.push(Edge {
                from,
                to,
                kind: rel.kind,
            });
        }

        index
    }

    /// Returns the handle for `name`, registering an isolated node if it is unknown.
    pub fn ensure_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        self.adjacency.push(Default::default());
        id
    }

    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.names[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len()).map(|i| NodeId(i as u32))
    }

    /// Edges that take part in crossing counts.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, id: NodeId, kind: RelationKind) -> &[NodeId] {
        self.adjacency
            .get(id.index())
            .map(|adj| adj[kind.slot()].as_slice())
            .unwrap_or(&[])
    }

    /// Size of the `prev`, `next` and `parallel` lists combined.
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency
            .get(id.index())
            .map(|adj| adj.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// The node itself followed by its direct neighbors of every kind, without repeats.
    ///
    /// Empty when `name` is unknown.
    pub fn neighborhood(&self, name: &str) -> Vec<&str> {
        let Some(id) = self.id(name) else {
            return Vec::new();
        };
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        seen.insert(id);
        let mut out = vec![self.name(id)];
        for kind in RelationKind::ALL {
            for &n in self.neighbors(id, kind) {
                if seen.insert(n) {
                    out.push(self.name(n));
                }
            }
        }
        out
    }
}
