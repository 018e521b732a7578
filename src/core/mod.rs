pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::{AtlasConfig, ConnectionRules, GenerationParams, KingdomAnchor, RingConfig};
pub use error::{AtlasError, Result};
pub use geometry::{lerp, Vec2};
pub use types::{KingdomId, NodeId};
