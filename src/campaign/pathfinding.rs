//! A* pathfinding over the world graph
//!
//! Edge cost and heuristic are both straight-line distance between node
//! positions. The heuristic never overestimates, so the first time the goal
//! is popped its route is optimal.
//!
//! When several routes tie on cost, which one is returned depends on the
//! heap's pop order for equal priorities. Callers must not rely on a
//! particular choice among equally short routes.

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::graph::WorldGraph;
use crate::core::types::NodeId;

/// Entry in the A* open set
#[derive(Debug, Clone)]
struct PathNode<'a> {
    id: &'a NodeId,
    g_cost: OrderedFloat<f64>,
    f_cost: OrderedFloat<f64>, // g_cost + heuristic
}

impl PartialEq for PathNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost
    }
}

impl Eq for PathNode<'_> {}

impl Ord for PathNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest path using A*
///
/// Returns None if either endpoint is missing or no path exists.
pub fn find_path(graph: &WorldGraph, start: &str, goal: &str) -> Option<Vec<NodeId>> {
    let start_node = graph.node(start)?;
    let goal_node = graph.node(goal)?;

    if start == goal {
        return Some(vec![start_node.id.clone()]);
    }

    let heuristic = |id: &str| -> f64 {
        graph
            .node(id)
            .map(|n| n.distance_to(goal_node))
            .unwrap_or(f64::INFINITY)
    };

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<&NodeId, &NodeId> = AHashMap::new();
    let mut g_scores: AHashMap<&NodeId, f64> = AHashMap::new();
    let mut closed: AHashSet<&NodeId> = AHashSet::new();

    g_scores.insert(&start_node.id, 0.0);
    open_set.push(PathNode {
        id: &start_node.id,
        g_cost: OrderedFloat(0.0),
        f_cost: OrderedFloat(heuristic(start)),
    });

    while let Some(current) = open_set.pop() {
        if current.id == &goal_node.id {
            return Some(reconstruct_path(&came_from, current.id));
        }

        // Stale entry superseded by a cheaper push
        let best_g = g_scores.get(current.id).copied().unwrap_or(f64::INFINITY);
        if current.g_cost.0 > best_g || !closed.insert(current.id) {
            continue;
        }

        let Some(current_node) = graph.node(current.id.as_str()) else {
            continue;
        };

        for neighbor in graph.neighbors(current.id.as_str()) {
            if closed.contains(neighbor) {
                continue;
            }
            let Some(neighbor_node) = graph.node(neighbor.as_str()) else {
                continue;
            };

            let tentative_g = best_g + current_node.distance_to(neighbor_node);
            let neighbor_g = g_scores.get(neighbor).copied().unwrap_or(f64::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.id);
                g_scores.insert(neighbor, tentative_g);

                open_set.push(PathNode {
                    id: neighbor,
                    g_cost: OrderedFloat(tentative_g),
                    f_cost: OrderedFloat(tentative_g + heuristic(neighbor.as_str())),
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path<'a>(
    came_from: &AHashMap<&'a NodeId, &'a NodeId>,
    mut current: &'a NodeId,
) -> Vec<NodeId> {
    let mut path = vec![current.clone()];
    while let Some(&prev) = came_from.get(current) {
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// Total Euclidean length of a path
///
/// Returns None if any consecutive pair is not connected by an edge.
pub fn path_length(graph: &WorldGraph, path: &[NodeId]) -> Option<f64> {
    path.windows(2)
        .map(|pair| graph.edge_weight(pair[0].as_str(), pair[1].as_str()))
        .sum()
}
