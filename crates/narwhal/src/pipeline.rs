//! String-keyed entry points: relations + focus in, positions + crossing report out.

use crate::cross_count;
use crate::error::Result;
use crate::graph::GraphIndex;
use crate::layering::assign_layers;
use crate::model::{CrossingReport, Layer, LayerAssignment, NamedLayer, Position, Relation};
use crate::optimize::Optimizer;
use crate::options::LayoutOptions;
use crate::position::to_named_positions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub focus: String,
    pub relations: Vec<Relation>,
    /// Layers returned by a previous pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Vec<NamedLayer>>,
}

impl LayoutInput {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    /// Only nodes reachable from the focus.
    pub positions: BTreeMap<String, Position>,
    pub crossings: CrossingReport,
    /// Final ordering; pass it back as the next call's hint.
    pub layers: Vec<NamedLayer>,
    pub reused_hint: bool,
}

/// Lays out the component reachable from `focus`.
///
/// A `focus` that no relation mentions yields a single node at `(0, 0)` with no crossings.
pub fn layout(
    relations: &[Relation],
    focus: &str,
    options: &LayoutOptions,
    hint: Option<&[NamedLayer]>,
) -> LayoutOutput {
    let _span = tracing::debug_span!("layout", focus, relations = relations.len()).entered();

    let mut index = GraphIndex::build(relations);
    let focus_id = index.ensure_node(focus);
    let initial = assign_layers(focus_id, &index);
    debug!(
        reachable = initial.node_count(),
        total = index.node_count(),
        layers = initial.len(),
        "layers assigned"
    );

    let hint = hint.and_then(|h| resolve_layers(&index, h));
    let optimized = Optimizer::new(&index, options).optimize(initial, hint.as_ref());

    LayoutOutput {
        positions: to_named_positions(&optimized.layers, &index),
        crossings: optimized.crossings,
        layers: name_layers(&optimized.layers, &index),
        reused_hint: optimized.reused_hint,
    }
}

pub fn layout_input(input: &LayoutInput, options: &LayoutOptions) -> LayoutOutput {
    layout(
        &input.relations,
        &input.focus,
        options,
        input.hint.as_deref(),
    )
}

/// Crossing report for caller-supplied layers.
///
/// Names that no relation mentions are registered as isolated nodes, so they still occupy their
/// column and the geometry matches what the caller drew.
pub fn count_crossings(relations: &[Relation], layers: &[NamedLayer]) -> CrossingReport {
    let mut index = GraphIndex::build(relations);
    let mut resolved = Vec::with_capacity(layers.len());
    for l in layers {
        let nodes = l.nodes.iter().map(|n| index.ensure_node(n)).collect();
        resolved.push(Layer {
            depth: l.depth,
            nodes,
        });
    }
    cross_count::count(&LayerAssignment::new(resolved), &index)
}

/// Resolves named layers against `index`; `None` if any name is unknown.
pub fn resolve_layers(index: &GraphIndex, layers: &[NamedLayer]) -> Option<LayerAssignment> {
    let mut out = Vec::with_capacity(layers.len());
    for l in layers {
        let nodes = l
            .nodes
            .iter()
            .map(|n| index.id(n))
            .collect::<Option<Vec<_>>>()?;
        out.push(Layer {
            depth: l.depth,
            nodes,
        });
    }
    Some(LayerAssignment::new(out))
}

pub fn name_layers(layers: &LayerAssignment, index: &GraphIndex) -> Vec<NamedLayer> {
    layers
        .layers
        .iter()
        .map(|l| NamedLayer {
            depth: l.depth,
            nodes: l.nodes.iter().map(|&n| index.name(n).to_string()).collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountInput {
    pub relations: Vec<Relation>,
    pub layers: Vec<NamedLayer>,
}

impl CountInput {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
