#![forbid(unsafe_code)]

//! Focus-centred layered layout for graphs of `prev` / `next` / `parallel` relations.
//!
//! Nodes reachable from a focus node are grouped into depth layers by a breadth-first walk
//! (`next` goes one layer down, `prev` one layer up, `parallel` stays), then the order inside
//! each layer is searched to reduce edge crossings, and finally every node gets a centred
//! `(column, row)` grid cell. Rendering is left to the caller.
//!
//! ```
//! use narwhal::{LayoutOptions, Relation, layout};
//!
//! let relations = vec![Relation::next("a", "b"), Relation::next("b", "c")];
//! let out = layout(&relations, "b", &LayoutOptions::exhaustive(), None);
//! assert_eq!(out.crossings.total(), 0);
//! assert_eq!(out.positions["a"].row, 1);
//! assert_eq!(out.positions["c"].row, -1);
//! ```

pub mod cross_count;
pub mod error;
pub mod graph;
pub mod layering;
pub mod model;
pub mod optimize;
pub mod options;
pub mod permutation;
pub mod pipeline;
pub mod position;
pub mod random;

pub use cross_count::CrossingCounter;
pub use error::{Error, Result};
pub use graph::{Edge, GraphIndex};
pub use layering::assign_layers;
pub use model::{
    CrossingReport, Layer, LayerAssignment, NamedLayer, NodeId, Position, Relation, RelationKind,
};
pub use optimize::{Optimized, Optimizer, optimize};
pub use options::{LayoutOptions, OrderingStrategy};
pub use pipeline::{
    CountInput, LayoutInput, LayoutOutput, count_crossings, layout, layout_input,
};
pub use position::{to_named_positions, to_positions};
pub use random::{RandomSource, XorShift64Star};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
