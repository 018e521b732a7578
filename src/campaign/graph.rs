//! World graph - nodes, canonical edges and the kingdom index
//!
//! The graph is a plain mutable container. It does no internal locking;
//! callers that share it across threads serialize access themselves.
//! Wholesale replacement (regenerate, reload) builds a fresh graph first and
//! swaps it in, so a failed rebuild leaves the previous graph untouched.

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::generator::MapGenerator;
use super::node::{Edge, Node, NodeKind};
use super::pathfinding;
use super::storage::{MapMetadata, MapSnapshot, MapStorage};
use crate::core::config::RingConfig;
use crate::core::error::{AtlasError, Result};
use crate::core::types::{KingdomId, NodeId};

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub nodes: usize,
    pub edges: usize,
    pub kingdoms: usize,
    /// Ring entries that had no matching anchor
    pub skipped_ring_entries: Vec<KingdomId>,
    /// Whether the generated map was written through the storage adapter
    pub saved: bool,
}

/// The strategic world: nodes connected by undirected routes
#[derive(Debug, Clone, Default)]
pub struct WorldGraph {
    nodes: AHashMap<NodeId, Node>,
    edges: Vec<Edge>,
    edge_set: AHashSet<Edge>,
    /// Neighbor lists in edge-insertion order
    adjacency: AHashMap<NodeId, Vec<NodeId>>,
    kingdoms: AHashMap<KingdomId, Vec<NodeId>>,
}

impl WorldGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from nodes and endpoint pairs
    ///
    /// Fails on the first edge that references a node not in `nodes`.
    pub fn from_parts<I, E>(nodes: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (a, b) in edges {
            graph.add_edge(a.as_str(), b.as_str())?;
        }
        Ok(graph)
    }

    /// Insert a node; an existing node with the same id is replaced
    pub fn add_node(&mut self, node: Node) {
        if let Some(previous) = self.nodes.remove(&node.id) {
            warn!(id = %node.id, "Duplicate node id, replacing previous node");
            if let Some(kingdom) = previous.kingdom() {
                self.unindex_kingdom_node(kingdom, &previous.id);
            }
        }

        if let Some(kingdom) = node.kingdom() {
            self.kingdoms
                .entry(kingdom.clone())
                .or_default()
                .push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    fn unindex_kingdom_node(&mut self, kingdom: &KingdomId, id: &NodeId) {
        if let Some(list) = self.kingdoms.get_mut(kingdom) {
            list.retain(|n| n != id);
            if list.is_empty() {
                self.kingdoms.remove(kingdom);
            }
        }
    }

    /// Connect two existing nodes; adding the same undirected edge twice is a no-op
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<()> {
        for id in [a, b] {
            if !self.nodes.contains_key(id) {
                return Err(AtlasError::MissingNode(NodeId::from(id)));
            }
        }

        let edge = Edge::new(a, b);
        if !self.edge_set.insert(edge.clone()) {
            return Ok(());
        }

        self.adjacency
            .entry(edge.from().clone())
            .or_default()
            .push(edge.to().clone());
        if edge.from() != edge.to() {
            self.adjacency
                .entry(edge.to().clone())
                .or_default()
                .push(edge.from().clone());
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Neighbor ids of `id`, in edge-insertion order
    pub fn neighbors(&self, id: &str) -> &[NodeId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shortest route from `start` to `goal`, inclusive of both
    ///
    /// `None` when either endpoint is missing or the goal is unreachable.
    pub fn find_path(&self, start: &str, goal: &str) -> Option<Vec<NodeId>> {
        let path = pathfinding::find_path(self, start, goal);
        if path.is_none() {
            debug!(start, goal, "No path");
        }
        path
    }

    /// Total Euclidean length of a route; `None` if it leaves the edge set
    pub fn path_length(&self, path: &[NodeId]) -> Option<f64> {
        pathfinding::path_length(self, path)
    }

    /// Euclidean length of the edge between `a` and `b`, if they are adjacent
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        if !self.edge_set.contains(&Edge::new(a, b)) {
            return None;
        }
        let (na, nb) = (self.nodes.get(a)?, self.nodes.get(b)?);
        Some(na.distance_to(nb))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Canonical edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kingdoms(&self) -> impl Iterator<Item = &KingdomId> {
        self.kingdoms.keys()
    }

    pub fn kingdom_count(&self) -> usize {
        self.kingdoms.len()
    }

    /// Ids of the nodes owned by `kingdom`, in insertion order
    pub fn kingdom_nodes(&self, kingdom: &str) -> &[NodeId] {
        self.kingdoms.get(kingdom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes per kind
    pub fn kind_counts(&self) -> BTreeMap<NodeKind, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.values() {
            *counts.entry(node.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Drop every node, edge and index entry
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Regenerate the whole graph from a ring configuration
    ///
    /// The new graph is built (and saved, when `storage` is given) before it
    /// replaces the current one.
    pub fn generate_from_config(
        &mut self,
        generator: &MapGenerator,
        config: &RingConfig,
        storage: Option<&MapStorage>,
    ) -> Result<GenerationReport> {
        let generated = generator.generate(config)?;
        let node_total = generated.nodes.len();
        let edge_total = generated.edges.len();
        let skipped = generated.skipped_ring_entries.clone();

        let fresh = Self::from_parts(
            generated.nodes,
            generated
                .edges
                .into_iter()
                .map(|e| (e.from().clone(), e.to().clone())),
        )?;

        if let Some(storage) = storage {
            let metadata = MapMetadata::generated(&fresh);
            storage.save(&fresh.export(metadata))?;
        }

        *self = fresh;
        info!(
            nodes = node_total,
            edges = edge_total,
            kingdoms = self.kingdom_count(),
            "World graph generated"
        );

        Ok(GenerationReport {
            nodes: node_total,
            edges: edge_total,
            kingdoms: self.kingdom_count(),
            skipped_ring_entries: skipped,
            saved: storage.is_some(),
        })
    }

    /// Export nodes and edges for persistence
    pub fn export(&self, metadata: MapMetadata) -> MapSnapshot {
        MapSnapshot::from_graph(self, metadata)
    }

    /// Build a graph from a previously exported snapshot
    pub fn from_snapshot(snapshot: MapSnapshot) -> Result<Self> {
        snapshot.into_graph()
    }

    /// Replace this graph with a snapshot's contents
    ///
    /// On error the current graph is left as it was.
    pub fn load_snapshot(&mut self, snapshot: MapSnapshot) -> Result<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }
}
