//! Crossing counts for a candidate layer assignment.
//!
//! Each edge is treated as a straight segment between grid cells. A node's `x` is its offset from
//! the middle of its layer, doubled so it stays integral (`2 * i - (len - 1)`), and `y` is the
//! layer depth; reversing a layer therefore mirrors it exactly. Two edges
//! confined to one shared layer are compared by the order of their endpoints along the layer;
//! every other pair goes through an orientation-based segment intersection test.

use crate::graph::{Edge, GraphIndex};
use crate::model::{CrossingReport, LayerAssignment, NodeId, RelationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i64,
    y: i64,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: NodeId,
    to: NodeId,
    u: Cell,
    v: Cell,
}

impl Segment {
    fn shares_endpoint(&self, other: &Segment) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    fn is_flat(&self) -> bool {
        self.u.y == self.v.y
    }
}

/// Reusable counter bound to one [`GraphIndex`].
///
/// Holds the per-call position index and segment buffer so repeated evaluations during
/// optimization do not reallocate.
#[derive(Debug, Clone)]
pub struct CrossingCounter<'a> {
    index: &'a GraphIndex,
    cells: Vec<Option<Cell>>,
    segments: Vec<Segment>,
}

impl<'a> CrossingCounter<'a> {
    pub fn new(index: &'a GraphIndex) -> Self {
        Self {
            index,
            cells: vec![None; index.node_count()],
            segments: Vec::with_capacity(index.edge_count()),
        }
    }

    pub fn count(&mut self, layers: &LayerAssignment) -> CrossingReport {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.cells.resize(self.index.node_count(), None);
        for layer in &layers.layers {
            let width = layer.nodes.len() as i64 - 1;
            for (column, &n) in layer.nodes.iter().enumerate() {
                if let Some(cell) = self.cells.get_mut(n.index()) {
                    *cell = Some(Cell {
                        x: 2 * column as i64 - width,
                        y: i64::from(layer.depth),
                    });
                }
            }
        }

        self.segments.clear();
        for edge in self.index.edges() {
            if let Some(seg) = canonical_segment(edge, &self.cells) {
                self.segments.push(seg);
            }
        }

        let mut report = CrossingReport::default();
        for (i, a) in self.segments.iter().enumerate() {
            for b in &self.segments[i + 1..] {
                if a.shares_endpoint(b) {
                    continue;
                }
                if a.is_flat() && b.is_flat() && a.u.y == b.u.y {
                    if !same_depth_disjoint(a, b) {
                        report.same_depth_crossings += 1;
                    }
                } else if segments_intersect(a.u, a.v, b.u, b.v) {
                    report.cross_depth_crossings += 1;
                }
            }
        }
        report
    }
}

/// One-shot crossing count. Prefer [`CrossingCounter`] when evaluating many candidates.
pub fn count(layers: &LayerAssignment, index: &GraphIndex) -> CrossingReport {
    CrossingCounter::new(index).count(layers)
}

/// Resolves an edge to grid cells; `None` if either endpoint is not laid out.
///
/// A `parallel` edge inside one layer runs left to right; an edge spanning layers runs from the
/// lower depth to the higher one.
fn canonical_segment(edge: &Edge, cells: &[Option<Cell>]) -> Option<Segment> {
    let p = (*cells.get(edge.from.index())?)?;
    let q = (*cells.get(edge.to.index())?)?;

    let (u, v) = if edge.kind == RelationKind::Parallel && p.y == q.y {
        if p.x <= q.x { (p, q) } else { (q, p) }
    } else if edge.kind != RelationKind::Parallel && p.y > q.y {
        (q, p)
    } else {
        (p, q)
    };

    Some(Segment {
        from: edge.from,
        to: edge.to,
        u,
        v,
    })
}

/// Two edges inside one layer are disjoint only when each joins neighboring positions in the
/// sorted order of the four endpoints and the two pairs do not interleave. Interleaved and
/// nested pairs both count as a crossing.
fn same_depth_disjoint(a: &Segment, b: &Segment) -> bool {
    let xs = [a.u.x, a.v.x, b.u.x, b.v.x];
    let rank = |x: i64| xs.iter().filter(|&&o| o < x).count();

    let (a1, a2) = (rank(a.u.x), rank(a.v.x));
    let (b1, b2) = (rank(b.u.x), rank(b.v.x));

    a1.abs_diff(a2) == 1
        && b1.abs_diff(b2) == 1
        && (a1.max(a2) < b1.min(b2) || b1.max(b2) < a1.min(a2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Cell, q: Cell, r: Cell) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    match val {
        0 => Orientation::Collinear,
        v if v > 0 => Orientation::Clockwise,
        _ => Orientation::CounterClockwise,
    }
}

/// `q` lies within the bounding box of `p`..`r` (only meaningful for collinear points).
fn on_segment(p: Cell, q: Cell, r: Cell) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

fn segments_intersect(p1: Cell, p2: Cell, q1: Cell, q2: Cell) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, q1, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, p2))
        || (o3 == Orientation::Collinear && on_segment(q1, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(q1, p2, q2))
}
