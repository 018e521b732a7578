pub mod generator;
pub mod graph;
pub mod node;
pub mod pathfinding;
pub mod storage;

pub use generator::{GeneratedMap, MapGenerator, CENTER_ID};
pub use graph::{GenerationReport, WorldGraph};
pub use node::{Edge, Node, NodeKind};
pub use storage::{EdgeRecord, MapMetadata, MapSnapshot, MapStorage, NodeRecord};
