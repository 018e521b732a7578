//! Generation configuration with documented constants
//!
//! All structural numbers of the ring generator are collected here with
//! explanations of their purpose and how they interact with each other.
//! Nothing in this module is process-wide state: callers build a value
//! (usually `Default` or a TOML file) and hand it to the generator.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{AtlasError, Result};
use crate::core::geometry::Vec2;
use crate::core::types::KingdomId;

/// Which families of edges the generator emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionRules {
    /// Connect every city, gate and outpost to its kingdom's capital
    pub hub_structure: bool,
    /// Connect each kingdom's `GateToCenter` to the world Center
    pub center_connection: bool,
    /// Link `GateToCW` of each kingdom to `GateToCCW` of its clockwise neighbor
    pub border_gates: bool,
}

impl Default for ConnectionRules {
    fn default() -> Self {
        Self {
            hub_structure: true,
            center_connection: true,
            border_gates: true,
        }
    }
}

/// Structural rules for the ring generator
///
/// These values place nodes relative to their capital. The defaults
/// assume capitals roughly 350-500 world units apart around the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    // === CITIES ===
    /// Number of satellite cities per kingdom
    ///
    /// Cities alternate sides of the capital→center axis. The first pair
    /// sits at `city_offset`, the next pair at twice that, and so on.
    pub city_count: usize,

    /// Perpendicular distance from capital to the first pair of cities
    pub city_offset: f64,

    // === BORDER GATES ===
    /// Distance from capital towards the center for the `GateToCenter` castle
    ///
    /// Should stay below the capital→center distance, otherwise the gate
    /// lands past the center.
    pub gate_to_center_dist: f64,

    /// Interpolation fraction along capital→neighbor-capital for side gates
    ///
    /// At 0.35 the two facing gates of neighboring kingdoms sit 30% of the
    /// capital distance apart, leaving a visible border road between them.
    /// Must lie strictly inside (0, 1).
    pub gate_to_neighbor_t: f64,

    // === OUTPOSTS ===
    /// Radius of the outpost circle around the capital
    pub outpost_radius: f64,

    /// One outpost per role, spread evenly around the circle
    ///
    /// Roles may repeat (two farms is normal).
    pub outpost_roles: Vec<String>,

    // === CONNECTIONS ===
    pub connections: ConnectionRules,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            city_count: 2,
            city_offset: 95.0,

            gate_to_center_dist: 120.0,
            gate_to_neighbor_t: 0.35,

            outpost_radius: 170.0,
            outpost_roles: ["Farm", "Farm", "Mine", "Lumber", "TradePost", "Ruin"]
                .iter()
                .map(|r| r.to_string())
                .collect(),

            connections: ConnectionRules::default(),
        }
    }
}

impl GenerationParams {
    /// Create params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes generated per kingdom when every neighbor gate is placed
    pub fn nodes_per_kingdom(&self) -> usize {
        1 + self.city_count + 3 + self.outpost_roles.len()
    }

    /// Validate params for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.city_offset.is_finite() && self.city_offset > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "city_offset ({}) must be positive",
                self.city_offset
            )));
        }

        if !(self.gate_to_center_dist.is_finite() && self.gate_to_center_dist > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "gate_to_center_dist ({}) must be positive",
                self.gate_to_center_dist
            )));
        }

        if !(self.gate_to_neighbor_t > 0.0 && self.gate_to_neighbor_t < 1.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "gate_to_neighbor_t ({}) must lie in (0, 1)",
                self.gate_to_neighbor_t
            )));
        }

        if !(self.outpost_radius.is_finite() && self.outpost_radius > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "outpost_radius ({}) must be positive",
                self.outpost_radius
            )));
        }

        Ok(())
    }
}

/// Capital anchor for one kingdom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KingdomAnchor {
    pub id: KingdomId,
    pub name: String,
    pub pos: Vec2,
}

impl KingdomAnchor {
    pub fn new(id: &str, name: &str, pos: (f64, f64)) -> Self {
        Self {
            id: KingdomId::from(id),
            name: name.to_string(),
            pos: pos.into(),
        }
    }
}

/// Ring of kingdom capitals around a shared center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub center: Vec2,
    /// Anchors in insertion order
    pub kingdoms: Vec<KingdomAnchor>,
    /// Clockwise order of kingdoms; anchor order when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_order: Option<Vec<KingdomId>>,
}

impl RingConfig {
    pub fn new(center: (f64, f64), kingdoms: Vec<KingdomAnchor>) -> Self {
        Self {
            center: center.into(),
            kingdoms,
            ring_order: None,
        }
    }

    pub fn with_ring_order(mut self, order: &[&str]) -> Self {
        self.ring_order = Some(order.iter().map(|k| KingdomId::from(*k)).collect());
        self
    }

    pub fn anchor(&self, id: &KingdomId) -> Option<&KingdomAnchor> {
        self.kingdoms.iter().find(|a| &a.id == id)
    }

    /// The explicit ring order, or anchor insertion order
    pub fn effective_ring_order(&self) -> Vec<KingdomId> {
        match &self.ring_order {
            Some(order) => order.clone(),
            None => self.kingdoms.iter().map(|a| a.id.clone()).collect(),
        }
    }
}

impl Default for RingConfig {
    /// The eight-kingdom world, clockwise from the south
    fn default() -> Self {
        Self::new(
            (500.0, 500.0),
            vec![
                KingdomAnchor::new("Necro", "Necropolis", (500.0, 1000.0)),
                KingdomAnchor::new("Steel", "Steelforge", (853.0, 853.0)),
                KingdomAnchor::new("Body", "Temple of Body", (1000.0, 500.0)),
                KingdomAnchor::new("Fire", "Fire Earth", (853.0, 146.0)),
                KingdomAnchor::new("Demons", "Demons", (500.0, 0.0)),
                KingdomAnchor::new("Nature", "Nature", (146.0, 146.0)),
                KingdomAnchor::new("Spirit", "Spirit", (0.0, 500.0)),
                KingdomAnchor::new("Water", "Water Wind", (146.0, 853.0)),
            ],
        )
        .with_ring_order(&[
            "Necro", "Steel", "Body", "Fire", "Demons", "Nature", "Spirit", "Water",
        ])
    }
}

/// Contents of a map configuration file
///
/// ```toml
/// center = [500.0, 500.0]
/// ring_order = ["A", "B"]
///
/// [[kingdoms]]
/// id = "A"
/// name = "Alpha"
/// pos = [0.0, 1000.0]
///
/// [generation]
/// outpost_radius = 150.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(flatten)]
    pub ring: RingConfig,
    #[serde(default)]
    pub generation: GenerationParams,
}

impl AtlasConfig {
    /// Parse and validate a TOML map configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AtlasConfig = toml::from_str(content)?;
        config.generation.validate()?;
        Ok(config)
    }

    /// Load a TOML map configuration from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            generation: GenerationParams::default(),
        }
    }
}
