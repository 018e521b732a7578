//! Procedural ring generator
//!
//! Turns a ring of kingdom capitals around a shared center into a full
//! node/edge set. Placement is pure geometry on the configured anchors, so
//! identical input always yields identical output.
//!
//! Per kingdom:
//! - a Capital at the anchor
//! - satellite Cities on the perpendicular to the capital→center axis
//! - BorderCastle gates towards the center and both ring neighbors
//! - Outposts evenly spaced on a circle around the capital
//!
//! Then one border link per adjacent kingdom pair, and a single Center
//! reachable only through each kingdom's `GateToCenter`.

use ahash::AHashSet;
use std::f64::consts::TAU;
use tracing::{debug, info, warn};

use super::node::{Edge, Node, NodeKind};
use crate::core::config::{GenerationParams, KingdomAnchor, RingConfig};
use crate::core::error::{AtlasError, Result};
use crate::core::geometry::{lerp, Vec2};
use crate::core::types::{KingdomId, NodeId};

/// Id of the single world center node
pub const CENTER_ID: &str = "Center";

pub const ROLE_CENTER: &str = "Center";
pub const ROLE_CAPITAL: &str = "Capital";
pub const ROLE_CITY: &str = "City";
pub const ROLE_GATE_TO_CENTER: &str = "GateToCenter";
pub const ROLE_GATE_TO_CW: &str = "GateToCW";
pub const ROLE_GATE_TO_CCW: &str = "GateToCCW";

pub fn capital_id(kingdom: &KingdomId) -> NodeId {
    NodeId(format!("{}_CAP", kingdom))
}

pub fn city_id(kingdom: &KingdomId, index: usize) -> NodeId {
    NodeId(format!("{}_CITY{}", kingdom, index))
}

pub fn gate_to_center_id(kingdom: &KingdomId) -> NodeId {
    NodeId(format!("{}_GATE_CTR", kingdom))
}

pub fn gate_cw_id(kingdom: &KingdomId) -> NodeId {
    NodeId(format!("{}_GATE_CW", kingdom))
}

pub fn gate_ccw_id(kingdom: &KingdomId) -> NodeId {
    NodeId(format!("{}_GATE_CCW", kingdom))
}

pub fn outpost_id(kingdom: &KingdomId, index: usize) -> NodeId {
    NodeId(format!("{}_OUT{}", kingdom, index))
}

/// Nodes and edges produced by one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    /// Center first, then each kingdom's nodes in ring order
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Ring entries without an anchor, in ring order
    pub skipped_ring_entries: Vec<KingdomId>,
}

impl GeneratedMap {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Ring neighbors of the kingdom at `index`: (clockwise, counter-clockwise)
fn ring_neighbors(ring: &[KingdomId], index: usize) -> (&KingdomId, &KingdomId) {
    let n = ring.len();
    (&ring[(index + 1) % n], &ring[(index + n - 1) % n])
}

/// Generator for ring-topology world maps
#[derive(Debug, Clone, Default)]
pub struct MapGenerator {
    params: GenerationParams,
}

impl MapGenerator {
    pub fn new(params: GenerationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate the full node/edge set for a ring configuration
    pub fn generate(&self, config: &RingConfig) -> Result<GeneratedMap> {
        if config.kingdoms.is_empty() {
            return Err(AtlasError::InvalidConfig(
                "ring configuration has no kingdom anchors".into(),
            ));
        }

        let ring = self.resolve_ring(config);
        let center = Node::center(CENTER_ID, CENTER_ID, config.center).with_role(ROLE_CENTER);
        let mut nodes = vec![center];
        let mut edges = Vec::new();
        let mut skipped = Vec::new();

        for (index, kingdom) in ring.iter().enumerate() {
            let Some(anchor) = config.anchor(kingdom) else {
                skipped.push(kingdom.clone());
                continue;
            };

            let (cw, ccw) = ring_neighbors(&ring, index);
            let neighbors = Neighbors {
                cw: (cw != kingdom).then(|| config.anchor(cw)).flatten(),
                ccw: (ccw != kingdom).then(|| config.anchor(ccw)).flatten(),
            };
            if cw == kingdom {
                debug!(kingdom = %kingdom, "Single-kingdom ring, skipping neighbor gates");
            }

            self.generate_kingdom(anchor, config.center, &neighbors, &mut nodes, &mut edges)?;
        }

        if self.params.connections.border_gates {
            edges.extend(self.inter_kingdom_edges(&ring, &nodes));
        }

        if !skipped.is_empty() {
            warn!(
                skipped = ?skipped,
                "Ring entries without anchors were skipped"
            );
        }

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            kingdoms = ring.len() - skipped.len(),
            "Map generated"
        );

        Ok(GeneratedMap {
            nodes,
            edges,
            skipped_ring_entries: skipped,
        })
    }

    /// Effective ring order with repeated entries dropped
    fn resolve_ring(&self, config: &RingConfig) -> Vec<KingdomId> {
        let mut seen = AHashSet::new();
        let mut ring = Vec::new();
        for kingdom in config.effective_ring_order() {
            if seen.insert(kingdom.clone()) {
                ring.push(kingdom);
            } else {
                warn!(kingdom = %kingdom, "Duplicate ring entry ignored");
            }
        }
        ring
    }

    fn generate_kingdom(
        &self,
        anchor: &KingdomAnchor,
        center: Vec2,
        neighbors: &Neighbors<'_>,
        nodes: &mut Vec<Node>,
        edges: &mut Vec<Edge>,
    ) -> Result<()> {
        let kingdom = &anchor.id;
        let owner = Some(kingdom.clone());
        let cap_id = capital_id(kingdom);
        let cap_pos = anchor.pos;

        let to_center = (center - cap_pos).normalize();
        if to_center == Vec2::ZERO {
            debug!(
                kingdom = %kingdom,
                "Capital sits on the center, axis nodes collapse onto it"
            );
        }

        nodes.push(
            Node::new(
                cap_id.clone(),
                anchor.name.clone(),
                cap_pos,
                NodeKind::Capital,
                owner.clone(),
            )?
            .with_role(ROLE_CAPITAL),
        );
        let mut spokes = Vec::new();

        // Cities alternate sides of the axis, moving outwards per pair
        let perp = to_center.perpendicular();
        for i in 0..self.params.city_count {
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            let rank = (i / 2 + 1) as f64;
            let pos = cap_pos + perp * (self.params.city_offset * rank * side);
            let id = city_id(kingdom, i + 1);
            let name = format!("{} City {}", kingdom, i + 1);
            nodes.push(
                Node::new(id.clone(), name, pos, NodeKind::City, owner.clone())?
                    .with_role(ROLE_CITY),
            );
            spokes.push(id);
        }

        // Border gates
        let ctr_id = gate_to_center_id(kingdom);
        nodes.push(
            Node::new(
                ctr_id.clone(),
                format!("{} Gate → Center", kingdom),
                cap_pos + to_center * self.params.gate_to_center_dist,
                NodeKind::BorderCastle,
                owner.clone(),
            )?
            .with_role(ROLE_GATE_TO_CENTER),
        );
        spokes.push(ctr_id.clone());

        let t = self.params.gate_to_neighbor_t;
        let side_gates = [
            (neighbors.cw, gate_cw_id(kingdom), ROLE_GATE_TO_CW),
            (neighbors.ccw, gate_ccw_id(kingdom), ROLE_GATE_TO_CCW),
        ];
        for (neighbor, id, role) in side_gates {
            let Some(neighbor) = neighbor else {
                continue;
            };
            nodes.push(
                Node::new(
                    id.clone(),
                    format!("{} Gate → {}", kingdom, neighbor.id),
                    lerp(cap_pos, neighbor.pos, t),
                    NodeKind::BorderCastle,
                    owner.clone(),
                )?
                .with_role(role),
            );
            spokes.push(id);
        }

        if self.params.connections.center_connection {
            edges.push(Edge::new(CENTER_ID, ctr_id));
        }

        // Outposts evenly spaced on a circle
        let roles = &self.params.outpost_roles;
        let radius = self.params.outpost_radius;
        for (i, role) in roles.iter().enumerate() {
            let index = i + 1;
            let angle = (index as f64 / roles.len() as f64) * TAU;
            let pos = cap_pos + Vec2::new(angle.cos() * radius, angle.sin() * radius);
            let id = outpost_id(kingdom, index);
            let name = format!("{} {} {}", kingdom, role, index);
            nodes.push(
                Node::new(id.clone(), name, pos, NodeKind::Outpost, owner.clone())?
                    .with_role(role.clone()),
            );
            spokes.push(id);
        }

        if self.params.connections.hub_structure {
            edges.extend(spokes.into_iter().map(|id| Edge::new(cap_id.clone(), id)));
        }

        Ok(())
    }

    /// One link per unordered pair of ring-adjacent kingdoms
    ///
    /// Kingdom K's `GateToCW` joins its clockwise neighbor's `GateToCCW`.
    /// A two-kingdom ring is adjacent on both sides but still gets a single
    /// link; a one-kingdom ring gets none.
    fn inter_kingdom_edges(&self, ring: &[KingdomId], nodes: &[Node]) -> Vec<Edge> {
        let placed: AHashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let mut linked: AHashSet<(&KingdomId, &KingdomId)> = AHashSet::new();
        let mut edges = Vec::new();

        for (index, kingdom) in ring.iter().enumerate() {
            let (cw, _) = ring_neighbors(ring, index);
            if cw == kingdom {
                continue;
            }

            let pair = if kingdom < cw { (kingdom, cw) } else { (cw, kingdom) };
            if linked.contains(&pair) {
                continue;
            }

            let (from, to) = (gate_cw_id(kingdom), gate_ccw_id(cw));
            if placed.contains(&from) && placed.contains(&to) {
                edges.push(Edge::new(from, to));
                linked.insert(pair);
            }
        }

        edges
    }
}

/// Anchors of a kingdom's ring neighbors, absent when no gate is placed
struct Neighbors<'a> {
    cw: Option<&'a KingdomAnchor>,
    ccw: Option<&'a KingdomAnchor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConnectionRules;

    fn two_kingdoms() -> RingConfig {
        RingConfig::new(
            (500.0, 500.0),
            vec![
                KingdomAnchor::new("A", "Alpha", (0.0, 1000.0)),
                KingdomAnchor::new("B", "Beta", (1000.0, 1000.0)),
            ],
        )
        .with_ring_order(&["A", "B"])
    }

    fn square_ring() -> RingConfig {
        RingConfig::new(
            (0.0, 0.0),
            vec![
                KingdomAnchor::new("N", "North", (0.0, 500.0)),
                KingdomAnchor::new("E", "East", (500.0, 0.0)),
                KingdomAnchor::new("S", "South", (0.0, -500.0)),
                KingdomAnchor::new("W", "West", (-500.0, 0.0)),
            ],
        )
    }

    fn find<'a>(map: &'a GeneratedMap, id: &str) -> &'a Node {
        map.nodes.iter().find(|n| n.id.as_str() == id).unwrap()
    }

    fn has_edge(map: &GeneratedMap, a: &str, b: &str) -> bool {
        map.edges.contains(&Edge::new(a, b))
    }

    #[test]
    fn test_empty_anchor_set_rejected() {
        let config = RingConfig::new((0.0, 0.0), Vec::new());
        let result = MapGenerator::default().generate(&config);
        assert!(matches!(result, Err(AtlasError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = GenerationParams {
            city_offset: 0.0,
            ..Default::default()
        };
        assert!(MapGenerator::new(params).is_err());
    }

    #[test]
    fn test_square_ring_counts() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();
        assert_eq!(map.node_count(), 1 + 4 * 12);
        // 11 spokes + 1 center link per kingdom, plus 4 ring links
        assert_eq!(map.edge_count(), 4 * 11 + 4 + 4);
        assert!(map.skipped_ring_entries.is_empty());
    }

    #[test]
    fn test_capital_and_city_placement() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();

        let cap = find(&map, "N_CAP");
        assert_eq!(cap.pos, Vec2::new(0.0, 500.0));
        assert_eq!(cap.name, "North");
        assert_eq!(cap.role.as_deref(), Some(ROLE_CAPITAL));

        // Axis N→center is (0,-1); perpendicular is (1,0)
        assert_eq!(find(&map, "N_CITY1").pos, Vec2::new(95.0, 500.0));
        assert_eq!(find(&map, "N_CITY2").pos, Vec2::new(-95.0, 500.0));
    }

    #[test]
    fn test_gate_placement() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();

        assert_eq!(find(&map, "N_GATE_CTR").pos, Vec2::new(0.0, 380.0));
        // N's clockwise neighbor is E at (500, 0)
        let cw = find(&map, "N_GATE_CW");
        assert_eq!(cw.pos, lerp(Vec2::new(0.0, 500.0), Vec2::new(500.0, 0.0), 0.35));
        assert_eq!(cw.role.as_deref(), Some(ROLE_GATE_TO_CW));
        assert_eq!(cw.name, "N Gate → E");
        assert_eq!(find(&map, "N_GATE_CCW").name, "N Gate → W");
    }

    #[test]
    fn test_outposts_on_circle() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();
        let cap = find(&map, "E_CAP").pos;

        for i in 1..=6 {
            let outpost = find(&map, &format!("E_OUT{}", i));
            assert_eq!(outpost.kind(), NodeKind::Outpost);
            assert!((outpost.pos.distance(&cap) - 170.0).abs() < 1e-9);
            assert!(has_edge(&map, "E_CAP", outpost.id.as_str()));
        }
        // Last outpost closes the circle at angle 2π
        let last = find(&map, "E_OUT6").pos;
        assert!((last.x - (cap.x + 170.0)).abs() < 1e-9);
        assert!((last.y - cap.y).abs() < 1e-9);
        assert_eq!(find(&map, "E_OUT3").role.as_deref(), Some("Mine"));
    }

    #[test]
    fn test_center_connects_only_to_center_gates() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();
        let center_edges: Vec<&Edge> = map
            .edges
            .iter()
            .filter(|e| e.touches(CENTER_ID))
            .collect();

        assert_eq!(center_edges.len(), 4);
        for edge in center_edges {
            let other = edge.other(CENTER_ID).unwrap();
            assert!(other.as_str().ends_with("_GATE_CTR"));
        }
        let center = find(&map, CENTER_ID);
        assert!(center.kingdom().is_none());
        assert_eq!(center.kind(), NodeKind::Center);
    }

    #[test]
    fn test_ring_links() {
        let map = MapGenerator::default().generate(&square_ring()).unwrap();
        assert!(has_edge(&map, "N_GATE_CW", "E_GATE_CCW"));
        assert!(has_edge(&map, "E_GATE_CW", "S_GATE_CCW"));
        assert!(has_edge(&map, "S_GATE_CW", "W_GATE_CCW"));
        assert!(has_edge(&map, "W_GATE_CW", "N_GATE_CCW"));
        assert!(!has_edge(&map, "N_GATE_CCW", "E_GATE_CW"));
    }

    #[test]
    fn test_single_kingdom_ring() {
        let config = RingConfig::new(
            (0.0, 0.0),
            vec![KingdomAnchor::new("Solo", "Solo", (0.0, 300.0))],
        );
        let map = MapGenerator::default().generate(&config).unwrap();

        // Capital, 2 cities, center gate, 6 outposts, plus Center
        assert_eq!(map.node_count(), 11);
        assert_eq!(map.edge_count(), 10);
        assert!(!map.nodes.iter().any(|n| n.id.as_str() == "Solo_GATE_CW"));
        assert!(!map.nodes.iter().any(|n| n.id.as_str() == "Solo_GATE_CCW"));
    }

    #[test]
    fn test_two_kingdom_ring_links_once() {
        let map = MapGenerator::default().generate(&two_kingdoms()).unwrap();
        let ring_links: Vec<&Edge> = map
            .edges
            .iter()
            .filter(|e| {
                e.from().as_str().contains("_GATE_C") && e.to().as_str().contains("_GATE_C")
            })
            .filter(|e| !e.touches(CENTER_ID))
            .collect();

        assert_eq!(ring_links.len(), 1);
        assert!(has_edge(&map, "A_GATE_CW", "B_GATE_CCW"));
        assert_eq!(map.node_count(), 1 + 2 * 12);
        assert_eq!(map.edge_count(), 2 * 11 + 2 + 1);
    }

    #[test]
    fn test_missing_anchor_skipped() {
        let config = square_ring().with_ring_order(&["N", "Ghost", "S", "W"]);
        let map = MapGenerator::default().generate(&config).unwrap();

        assert_eq!(map.skipped_ring_entries, vec![KingdomId::from("Ghost")]);
        // N's clockwise neighbor has no anchor
        assert!(!map.nodes.iter().any(|n| n.id.as_str() == "N_GATE_CW"));
        assert!(!map.nodes.iter().any(|n| n.id.as_str() == "S_GATE_CCW"));
        // E is anchored but not in the ring
        assert!(!map.nodes.iter().any(|n| n.id.as_str() == "E_CAP"));
        assert!(has_edge(&map, "S_GATE_CW", "W_GATE_CCW"));
        assert!(has_edge(&map, "W_GATE_CW", "N_GATE_CCW"));
    }

    #[test]
    fn test_duplicate_ring_entries_ignored() {
        let config = two_kingdoms().with_ring_order(&["A", "B", "A"]);
        let map = MapGenerator::default().generate(&config).unwrap();
        assert_eq!(map.node_count(), 1 + 2 * 12);
    }

    #[test]
    fn test_connection_rules_disabled() {
        let params = GenerationParams {
            connections: ConnectionRules {
                hub_structure: false,
                center_connection: false,
                border_gates: false,
            },
            ..Default::default()
        };
        let map = MapGenerator::new(params).unwrap().generate(&square_ring()).unwrap();
        assert_eq!(map.node_count(), 49);
        assert!(map.edges.is_empty());
    }

    #[test]
    fn test_extra_cities_alternate_sides() {
        let params = GenerationParams {
            city_count: 3,
            ..Default::default()
        };
        let map = MapGenerator::new(params).unwrap().generate(&square_ring()).unwrap();
        assert_eq!(find(&map, "N_CITY3").pos, Vec2::new(190.0, 500.0));
    }

    #[test]
    fn test_capital_on_center_is_not_fatal() {
        let config = RingConfig::new(
            (0.0, 0.0),
            vec![
                KingdomAnchor::new("A", "A", (0.0, 0.0)),
                KingdomAnchor::new("B", "B", (400.0, 0.0)),
            ],
        );
        let map = MapGenerator::default().generate(&config).unwrap();
        assert_eq!(find(&map, "A_GATE_CTR").pos, Vec2::new(0.0, 0.0));
        assert_eq!(find(&map, "A_CITY1").pos, Vec2::new(0.0, 0.0));
    }
}
