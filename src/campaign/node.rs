//! Node - a place on the campaign map
//!
//! Nodes are the points of interest of the world graph. Edges between them
//! are undirected and stored once in canonical (sorted) form.

use serde::{Deserialize, Serialize};

use crate::core::error::{AtlasError, Result};
use crate::core::geometry::Vec2;
use crate::core::types::{KingdomId, NodeId};

/// Structural kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Center,
    Capital,
    City,
    BorderCastle,
    Outpost,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Center,
        NodeKind::Capital,
        NodeKind::City,
        NodeKind::BorderCastle,
        NodeKind::Outpost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::Capital => "Capital",
            Self::City => "City",
            Self::BorderCastle => "BorderCastle",
            Self::Outpost => "Outpost",
        }
    }
}

/// A node on the campaign map
///
/// Kind and owning kingdom are fixed at construction so a `Center` can
/// never pick up an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub pos: Vec2,
    kind: NodeKind,
    kingdom: Option<KingdomId>,
    pub role: Option<String>,
}

impl Node {
    /// Create a node, rejecting a `Center` that belongs to a kingdom
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        pos: Vec2,
        kind: NodeKind,
        kingdom: Option<KingdomId>,
    ) -> Result<Self> {
        let id = id.into();
        if kind == NodeKind::Center {
            if let Some(kingdom) = &kingdom {
                return Err(AtlasError::InvalidNode(format!(
                    "Center node {} cannot belong to kingdom {}",
                    id, kingdom
                )));
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            pos,
            kind,
            kingdom,
            role: None,
        })
    }

    /// The single world center; never owned by a kingdom
    pub fn center(id: impl Into<NodeId>, name: impl Into<String>, pos: Vec2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pos,
            kind: NodeKind::Center,
            kingdom: None,
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn kingdom(&self) -> Option<&KingdomId> {
        self.kingdom.as_ref()
    }

    pub fn belongs_to(&self, kingdom: &str) -> bool {
        self.kingdom.as_ref().is_some_and(|k| k.as_str() == kingdom)
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        self.pos.distance(&other.pos)
    }
}

/// Undirected edge in canonical form: `a <= b`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    a: NodeId,
    b: NodeId,
}

impl Edge {
    pub fn new(x: impl Into<NodeId>, y: impl Into<NodeId>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Smaller endpoint id
    pub fn from(&self) -> &NodeId {
        &self.a
    }

    /// Larger endpoint id
    pub fn to(&self) -> &NodeId {
        &self.b
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a.as_str() == id || self.b.as_str() == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint
    pub fn other(&self, id: &str) -> Option<&NodeId> {
        if self.a.as_str() == id {
            Some(&self.b)
        } else if self.b.as_str() == id {
            Some(&self.a)
        } else {
            None
        }
    }
}
