//! JSON persistence for generated maps
//!
//! A saved map is a list of node records, a list of edge records and an
//! optional metadata block. Metadata is informational only: unknown fields
//! are ignored and every known field may be absent.
//!
//! Older files used `node_type`/`kingdom` for node fields and `[a, b]`
//! pairs for edges; both spellings are still accepted on load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::graph::WorldGraph;
use super::node::{Node, NodeKind};
use crate::core::error::Result;
use crate::core::geometry::Vec2;
use crate::core::types::{KingdomId, NodeId};

/// Default location of the saved world map
pub const DEFAULT_MAP_PATH: &str = "data/generated_map.json";

/// Descriptive header of a saved map
///
/// Parsing is lenient: a missing or non-object block yields empty metadata,
/// and a field of the wrong type reads as absent instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapMetadata {
    pub version: Option<String>,
    pub description: Option<String>,
    pub nodes_count: Option<usize>,
    pub edges_count: Option<usize>,
    pub kingdoms_count: Option<usize>,
}

impl MapMetadata {
    /// Metadata describing a freshly generated graph
    pub fn generated(graph: &WorldGraph) -> Self {
        Self {
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            description: Some("Generated from ring configuration".to_string()),
            nodes_count: Some(graph.node_count()),
            edges_count: Some(graph.edge_count()),
            kingdoms_count: Some(graph.kingdom_count()),
        }
    }

    /// Read known fields out of an arbitrary JSON value
    pub fn from_value(value: &Value) -> Self {
        Self {
            version: value.get("version").and_then(text_field),
            description: value.get("description").and_then(text_field),
            nodes_count: value.get("nodes_count").and_then(count_field),
            edges_count: value.get("edges_count").and_then(count_field),
            kingdoms_count: value.get("kingdoms_count").and_then(count_field),
        }
    }
}

impl<'de> Deserialize<'de> for MapMetadata {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn count_field(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A node as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: String,
    pub pos: [f64; 2],
    #[serde(alias = "node_type")]
    pub kind: NodeKind,
    #[serde(default, alias = "kingdom")]
    pub owning_kingdom: Option<KingdomId>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            pos: node.pos.to_array(),
            kind: node.kind(),
            owning_kingdom: node.kingdom().cloned(),
            role: node.role.clone(),
        }
    }
}

impl TryFrom<NodeRecord> for Node {
    type Error = crate::core::error::AtlasError;

    fn try_from(record: NodeRecord) -> Result<Self> {
        let node = Node::new(
            record.id,
            record.name,
            Vec2::from(record.pos),
            record.kind,
            record.owning_kingdom,
        )?;
        Ok(match record.role {
            Some(role) => node.with_role(role),
            None => node,
        })
    }
}

/// An undirected edge as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EdgeRepr")]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeRepr {
    Object { from: NodeId, to: NodeId },
    Pair([NodeId; 2]),
}

impl From<EdgeRepr> for EdgeRecord {
    fn from(repr: EdgeRepr) -> Self {
        match repr {
            EdgeRepr::Object { from, to } => Self { from, to },
            EdgeRepr::Pair([from, to]) => Self { from, to },
        }
    }
}

/// Exported contents of a world graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    #[serde(default)]
    pub metadata: MapMetadata,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl MapSnapshot {
    /// Capture a graph; nodes are sorted by id, edges keep insertion order
    pub fn from_graph(graph: &WorldGraph, metadata: MapMetadata) -> Self {
        let mut nodes: Vec<NodeRecord> = graph.nodes().map(NodeRecord::from).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeRecord {
                from: e.from().clone(),
                to: e.to().clone(),
            })
            .collect();

        Self {
            metadata,
            nodes,
            edges,
        }
    }

    /// Rebuild a graph, validating nodes and edge endpoints
    pub fn into_graph(self) -> Result<WorldGraph> {
        let nodes = self
            .nodes
            .into_iter()
            .map(Node::try_from)
            .collect::<Result<Vec<_>>>()?;
        WorldGraph::from_parts(nodes, self.edges.into_iter().map(|e| (e.from, e.to)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Saves and loads map snapshots as JSON files
#[derive(Debug, Clone)]
pub struct MapStorage {
    save_path: PathBuf,
}

impl MapStorage {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Write a snapshot, creating parent directories as needed
    pub fn save(&self, snapshot: &MapSnapshot) -> Result<()> {
        if let Some(parent) = self.save_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.save_path, snapshot.to_json()?)?;
        info!(
            path = %self.save_path.display(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Map saved"
        );
        Ok(())
    }

    pub fn load(&self) -> Result<MapSnapshot> {
        let content = fs::read_to_string(&self.save_path)?;
        let snapshot = MapSnapshot::from_json(&content)?;
        info!(
            path = %self.save_path.display(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Map loaded"
        );
        Ok(snapshot)
    }

    /// Load the saved map straight into a graph
    pub fn load_graph(&self) -> Result<WorldGraph> {
        self.load()?.into_graph()
    }
}

impl Default for MapStorage {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_PATH)
    }
}
