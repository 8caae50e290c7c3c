//! Input relations, layer assignments and layout output types.
//!
//! Nodes are interned into dense [`NodeId`] handles by [`crate::graph::GraphIndex`]; everything
//! that crosses the library boundary (relations, named layers, positions) uses string ids.

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Dense handle of a node inside one [`crate::graph::GraphIndex`].
///
/// Handles are only meaningful for the index that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationKind {
    /// `to` precedes `from`: `to` sits one layer below `from`.
    Prev,
    /// `from` precedes `to`: `to` sits one layer above `from`.
    Next,
    /// Symmetric; both endpoints share a layer.
    Parallel,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Prev,
        RelationKind::Next,
        RelationKind::Parallel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Prev => "prev",
            RelationKind::Next => "next",
            RelationKind::Parallel => "parallel",
        }
    }

    /// Kind seen from the other endpoint of the relation.
    pub fn inverse(self) -> Self {
        match self {
            RelationKind::Prev => RelationKind::Next,
            RelationKind::Next => RelationKind::Prev,
            RelationKind::Parallel => RelationKind::Parallel,
        }
    }

    /// Numeric step codes used by older relation dumps (`0 = prev`, `1 = next`, `2 = parallel`).
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(RelationKind::Prev),
            1 => Some(RelationKind::Next),
            2 => Some(RelationKind::Parallel),
            _ => None,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            RelationKind::Prev => 0,
            RelationKind::Next => 1,
            RelationKind::Parallel => 2,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prev" => Ok(RelationKind::Prev),
            "next" => Ok(RelationKind::Next),
            "parallel" => Ok(RelationKind::Parallel),
            _ => Err(Error::UnknownRelationKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl Serialize for RelationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KindVisitor;

        impl Visitor<'_> for KindVisitor {
            type Value = RelationKind;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"prev\", \"next\", \"parallel\" or a step code 0..=2")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RelationKind, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RelationKind, E> {
                RelationKind::from_code(v)
                    .ok_or_else(|| E::custom(format!("unknown relation step code: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RelationKind, E> {
                match u64::try_from(v) {
                    Ok(v) => self.visit_u64(v),
                    Err(_) => Err(E::custom(format!("unknown relation step code: {v}"))),
                }
            }
        }

        deserializer.deserialize_any(KindVisitor)
    }
}

/// A typed relation between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    #[serde(alias = "type")]
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    pub fn next(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, RelationKind::Next)
    }

    pub fn prev(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, RelationKind::Prev)
    }

    pub fn parallel(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, RelationKind::Parallel)
    }
}

/// Nodes sharing one depth. The order of `nodes` is what the optimizer searches over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub depth: i32,
    pub nodes: Vec<NodeId>,
}

/// Layers sorted by ascending depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerAssignment {
    pub layers: Vec<Layer>,
}

impl LayerAssignment {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().map(|l| l.nodes.len()).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layers.iter().flat_map(|l| l.nodes.iter().copied())
    }
}

/// String-keyed layer, used for output and for passing a previous result back as a hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLayer {
    pub depth: i32,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossingReport {
    pub same_depth_crossings: usize,
    pub cross_depth_crossings: usize,
}

impl CrossingReport {
    pub fn total(&self) -> usize {
        self.same_depth_crossings + self.cross_depth_crossings
    }
}

/// Grid cell of a node: `column` is centred around 0 within the layer, `row` is the depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub column: i32,
    pub row: i32,
}
