use crate::graph::GraphIndex;
use crate::model::{LayerAssignment, NodeId, Position};
use std::collections::BTreeMap;

/// Grid positions for a finalized assignment.
///
/// Node `i` of a layer with `len` nodes gets `column = i - floor(len / 2)`, so every layer is
/// centred on column 0; `row` is the layer depth.
pub fn to_positions(layers: &LayerAssignment) -> BTreeMap<NodeId, Position> {
    let mut out = BTreeMap::new();
    for layer in &layers.layers {
        let half = (layer.nodes.len() / 2) as i32;
        for (i, &n) in layer.nodes.iter().enumerate() {
            out.insert(
                n,
                Position {
                    column: i as i32 - half,
                    row: layer.depth,
                },
            );
        }
    }
    out
}

/// [`to_positions`] keyed by node name.
pub fn to_named_positions(
    layers: &LayerAssignment,
    index: &GraphIndex,
) -> BTreeMap<String, Position> {
    to_positions(layers)
        .into_iter()
        .map(|(n, pos)| (index.name(n).to_string(), pos))
        .collect()
}
