//! Realm Atlas - procedural kingdom-ring world graph
//!
//! A ring of kingdom capitals around a shared center is expanded into a
//! graph of capitals, cities, border castles and outposts, with A* routing
//! between any two locations.

pub mod campaign;
pub mod core;
