//! Within-layer ordering to reduce crossings.
//!
//! [`OrderingStrategy::Search`] runs, stopping as soon as a zero-crossing configuration is found:
//!
//! 1. hint reuse: a compatible previous assignment is returned as-is if it has no crossings;
//! 2. per-layer candidates: every ordering of a layer when `n!` fits the exploration budget,
//!    otherwise a bounded sample;
//! 3. joint search over the first 1, 2, 3, ... layers, walking the cartesian product of their
//!    candidates (or sampling it when the product exceeds the budget);
//! 4. a refinement pass that re-searches each layer alone while the others stay fixed.
//!
//! [`OrderingStrategy::Barycenter`] instead runs a fixed number of down/up barycenter sweeps.
//!
//! All intermediate state is local to one [`Optimizer::optimize`] call; the best configuration
//! is only handed back when the call returns, so stopping early never leaves partial results
//! anywhere.

use crate::cross_count::CrossingCounter;
use crate::graph::GraphIndex;
use crate::layering::layer_index_of;
use crate::model::{CrossingReport, Layer, LayerAssignment, NodeId, RelationKind};
use crate::options::{LayoutOptions, OrderingStrategy};
use crate::permutation::{Odometer, layer_candidates};
use crate::random::{RandomSource, XorShift64Star};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub layers: LayerAssignment,
    pub crossings: CrossingReport,
    /// Number of crossing evaluations spent.
    pub evaluations: usize,
    /// The hint was compatible and crossing-free, and was returned unchanged.
    pub reused_hint: bool,
    /// The pass stopped on the evaluation cap or the cancel flag.
    pub stopped_early: bool,
}

pub struct Optimizer<'a, R = XorShift64Star> {
    index: &'a GraphIndex,
    options: LayoutOptions,
    rng: R,
    counter: CrossingCounter<'a>,
    cancel: Option<Arc<AtomicBool>>,
    evaluations: usize,
    stopped: bool,
}

impl<'a> Optimizer<'a, XorShift64Star> {
    /// Optimizer with the random source described by `options` (seeded, or clock-seeded).
    pub fn new(index: &'a GraphIndex, options: &LayoutOptions) -> Self {
        let rng = options.random_source();
        Self::with_random_source(index, options, rng)
    }
}

impl<'a, R: RandomSource> Optimizer<'a, R> {
    pub fn with_random_source(index: &'a GraphIndex, options: &LayoutOptions, rng: R) -> Self {
        Self {
            index,
            options: options.clone(),
            rng,
            counter: CrossingCounter::new(index),
            cancel: None,
            evaluations: 0,
            stopped: false,
        }
    }

    /// Flag polled between candidate evaluations. Once set, the pass returns the best
    /// configuration found so far.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn optimize(
        &mut self,
        initial: LayerAssignment,
        hint: Option<&LayerAssignment>,
    ) -> Optimized {
        self.evaluations = 0;
        self.stopped = false;

        if let Some(hinted) = hint.and_then(|h| adopt_hint(h, &initial)) {
            let crossings = self.evaluate(&hinted);
            if crossings.total() == 0 {
                debug!(layers = hinted.len(), "reusing crossing-free hint");
                return self.finish(hinted, crossings, true);
            }
            debug!(
                crossings = crossings.total(),
                "hint has crossings; optimizing from scratch"
            );
        }

        match self.options.strategy {
            OrderingStrategy::Search => self.search(initial),
            OrderingStrategy::Barycenter => self.barycenter(initial),
        }
    }

    fn search(&mut self, initial: LayerAssignment) -> Optimized {
        let budget = self.options.exploration_budget.max(1);
        let sampling = self.options.sampling;

        let mut best = initial.clone();
        let mut best_report = self.evaluate(&best);
        debug!(
            nodes = best.node_count(),
            edges = self.index.edge_count(),
            layers = best.len(),
            crossings = best_report.total(),
            "search start"
        );

        let mut candidates: Vec<Vec<Vec<NodeId>>> = Vec::with_capacity(initial.len());
        let mut picks: Vec<usize> = Vec::with_capacity(initial.len());

        for layer in &initial.layers {
            if best_report.total() == 0 || self.should_stop() {
                break;
            }
            candidates.push(layer_candidates(&layer.nodes, budget, sampling, &mut self.rng));

            let radices: Vec<usize> = candidates.iter().map(Vec::len).collect();
            let product = radices
                .iter()
                .try_fold(1usize, |acc, &r| acc.checked_mul(r))
                .unwrap_or(usize::MAX);
            let random_joint = sampling && product > budget;
            let mut odometer = Odometer::new(radices.clone());

            let mut work = best.clone();
            let mut round_min = best_report.total();
            let mut round_best: Option<(LayerAssignment, CrossingReport)> = None;

            for _ in 0..product.min(budget) {
                if self.should_stop() {
                    break;
                }
                picks.clear();
                if random_joint {
                    for &r in &radices {
                        picks.push(self.rng.next_usize(r));
                    }
                } else {
                    let Some(digits) = odometer.advance() else {
                        break;
                    };
                    picks.extend_from_slice(digits);
                }

                for (li, &pick) in picks.iter().enumerate() {
                    work.layers[li].nodes.clone_from(&candidates[li][pick]);
                }
                let report = self.evaluate(&work);
                if report.total() < round_min {
                    round_min = report.total();
                    round_best = Some((work.clone(), report));
                }
                if report.total() == 0 {
                    break;
                }
            }

            if let Some((layers, report)) = round_best {
                best = layers;
                best_report = report;
            }
            trace!(
                width = candidates.len(),
                product,
                crossings = best_report.total(),
                "joint search round"
            );
        }

        if best_report.total() > 0 {
            (best, best_report) = self.refine(best, best_report);
        }

        debug!(
            crossings = best_report.total(),
            evaluations = self.evaluations,
            stopped_early = self.stopped,
            "search done"
        );
        self.finish(best, best_report, false)
    }

    /// Re-searches each layer on its own with every other layer fixed, keeping strict
    /// improvements.
    fn refine(
        &mut self,
        mut best: LayerAssignment,
        mut best_report: CrossingReport,
    ) -> (LayerAssignment, CrossingReport) {
        let budget = self.options.exploration_budget.max(1);
        let sampling = self.options.sampling;

        for li in 0..best.len() {
            if self.should_stop() {
                break;
            }
            let perms = layer_candidates(&best.layers[li].nodes, budget, sampling, &mut self.rng);
            let mut work = best.clone();
            let mut layer_min = best_report.total();
            let mut improved: Option<(Vec<NodeId>, CrossingReport)> = None;

            for perm in perms {
                if self.should_stop() {
                    break;
                }
                work.layers[li].nodes = perm;
                let report = self.evaluate(&work);
                if report.total() < layer_min {
                    layer_min = report.total();
                    improved = Some((work.layers[li].nodes.clone(), report));
                }
                if report.total() == 0 {
                    break;
                }
            }

            if let Some((nodes, report)) = improved {
                best.layers[li].nodes = nodes;
                best_report = report;
            }
            if best_report.total() == 0 {
                break;
            }
        }

        (best, best_report)
    }

    fn barycenter(&mut self, initial: LayerAssignment) -> Optimized {
        let mut layers = initial;
        let layer_of = layer_index_of(&layers, self.index.node_count());
        let mut columns: Vec<usize> = vec![0; self.index.node_count()];
        for layer in &layers.layers {
            for (col, &n) in layer.nodes.iter().enumerate() {
                if let Some(slot) = columns.get_mut(n.index()) {
                    *slot = col;
                }
            }
        }

        let count = layers.len();
        for _ in 0..self.options.sweep_iterations {
            if self.cancel_requested() {
                self.stopped = true;
                break;
            }
            for i in 1..count {
                let layer = &mut layers.layers[i];
                reorder_by_barycenter(self.index, layer, i - 1, &layer_of, &mut columns);
            }
            for i in (0..count.saturating_sub(1)).rev() {
                let layer = &mut layers.layers[i];
                reorder_by_barycenter(self.index, layer, i + 1, &layer_of, &mut columns);
            }
        }

        let crossings = self.evaluate(&layers);
        debug!(
            layers = count,
            crossings = crossings.total(),
            stopped_early = self.stopped,
            "barycenter sweeps done"
        );
        self.finish(layers, crossings, false)
    }

    fn evaluate(&mut self, layers: &LayerAssignment) -> CrossingReport {
        self.evaluations += 1;
        self.counter.count(layers)
    }

    fn cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn should_stop(&mut self) -> bool {
        let capped = self
            .options
            .max_evaluations
            .is_some_and(|cap| self.evaluations >= cap);
        if capped || self.cancel_requested() {
            self.stopped = true;
        }
        self.stopped
    }

    fn finish(
        &self,
        layers: LayerAssignment,
        crossings: CrossingReport,
        reused_hint: bool,
    ) -> Optimized {
        Optimized {
            layers,
            crossings,
            evaluations: self.evaluations,
            reused_hint,
            stopped_early: self.stopped,
        }
    }
}

/// Runs one optimization pass with the random source configured in `options`.
pub fn optimize(
    initial: LayerAssignment,
    index: &GraphIndex,
    options: &LayoutOptions,
    hint: Option<&LayerAssignment>,
) -> Optimized {
    Optimizer::new(index, options).optimize(initial, hint)
}

/// Takes the orderings of `hint` if it lays out exactly the same node sets per layer as
/// `fresh`; depths come from `fresh`.
fn adopt_hint(hint: &LayerAssignment, fresh: &LayerAssignment) -> Option<LayerAssignment> {
    if hint.len() != fresh.len() {
        return None;
    }
    let mut layers = Vec::with_capacity(fresh.len());
    for (h, f) in hint.layers.iter().zip(&fresh.layers) {
        if h.nodes.len() != f.nodes.len() {
            return None;
        }
        let mut a = h.nodes.clone();
        let mut b = f.nodes.clone();
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return None;
        }
        layers.push(Layer {
            depth: f.depth,
            nodes: h.nodes.clone(),
        });
    }
    Some(LayerAssignment::new(layers))
}

/// Sorts `layer` by the mean column of each node's prev/next neighbors in layer `adjacent`.
/// Nodes without such neighbors keep their current column as key; ties keep current order.
fn reorder_by_barycenter(
    index: &GraphIndex,
    layer: &mut Layer,
    adjacent: usize,
    layer_of: &[Option<usize>],
    columns: &mut [usize],
) {
    let mut keyed: Vec<(f64, usize, NodeId)> = layer
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, &n)| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for kind in [RelationKind::Prev, RelationKind::Next] {
                for &m in index.neighbors(n, kind) {
                    if layer_of.get(m.index()).copied().flatten() == Some(adjacent) {
                        sum += columns[m.index()] as f64;
                        count += 1;
                    }
                }
            }
            let bary = if count > 0 {
                sum / count as f64
            } else {
                idx as f64
            };
            (bary, idx, n)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    for (col, &(_, _, n)) in keyed.iter().enumerate() {
        layer.nodes[col] = n;
        if let Some(slot) = columns.get_mut(n.index()) {
            *slot = col;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::adopt_hint;
    use crate::model::{Layer, LayerAssignment, NodeId};

    fn layer(depth: i32, ids: &[u32]) -> Layer {
        Layer {
            depth,
            nodes: ids.iter().map(|&i| NodeId(i)).collect(),
        }
    }

    #[test]
    fn hint_with_same_node_sets_is_adopted_with_fresh_depths() {
        let fresh = LayerAssignment::new(vec![layer(-1, &[0, 1]), layer(0, &[2])]);
        let hint = LayerAssignment::new(vec![layer(3, &[1, 0]), layer(4, &[2])]);
        let adopted = adopt_hint(&hint, &fresh).unwrap();
        assert_eq!(adopted.layers[0], layer(-1, &[1, 0]));
        assert_eq!(adopted.layers[1], layer(0, &[2]));
    }

    #[test]
    fn hint_with_different_nodes_is_rejected() {
        let fresh = LayerAssignment::new(vec![layer(0, &[0, 1])]);
        assert!(adopt_hint(&LayerAssignment::new(vec![layer(0, &[0, 2])]), &fresh).is_none());
        assert!(adopt_hint(&LayerAssignment::new(vec![layer(0, &[0])]), &fresh).is_none());
        assert!(
            adopt_hint(
                &LayerAssignment::new(vec![layer(0, &[0]), layer(1, &[1])]),
                &fresh
            )
            .is_none()
        );
    }
}
