//! Hex-grid pathfinding: A* shortest path and budgeted reachable sets.
//!
//! Costs are integer movement points: entering a tile costs that tile's
//! movement cost, the start tile is free. Both searches break priority ties
//! by insertion sequence number, so equal-cost alternatives always resolve
//! the same way.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::map::TileLookup;

/// Result of [`find_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Coordinates from start to end inclusive; empty when unreachable.
    pub path: Vec<HexCoord>,
    /// Sum of entered tiles' costs; `None` (infinite) when unreachable.
    pub total_cost: Option<u32>,
    /// Whether a path within budget exists.
    pub reachable: bool,
}

impl PathResult {
    /// The "no path" result.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            total_cost: None,
            reachable: false,
        }
    }
}

/// A node in the open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct OpenNode {
    coord: HexCoord,
    /// Cost so far; used to skip stale queue entries.
    g_score: u32,
    /// Priority: `g + h` for A*, `g` for Dijkstra.
    f_score: u32,
    /// Insertion sequence number, the deterministic tie-breaker.
    sequence: u64,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lower f and then earlier insertion win.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue with a running insertion counter.
struct OpenSet {
    heap: BinaryHeap<OpenNode>,
    next_sequence: u64,
}

impl OpenSet {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    fn push(&mut self, coord: HexCoord, g_score: u32, f_score: u32) {
        self.heap.push(OpenNode {
            coord,
            g_score,
            f_score,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop()
    }
}

/// Shortest path from `start` to `end` by total movement cost.
///
/// `max_budget` of `None` is an unlimited budget. Nodes whose cost so far
/// would exceed the budget are never expanded. An impassable or off-map
/// `end` is unreachable from every start, including itself; otherwise
/// `start == end` is a zero-cost single-node path.
pub fn find_path(
    map: &(impl TileLookup + ?Sized),
    start: HexCoord,
    end: HexCoord,
    max_budget: Option<u32>,
) -> PathResult {
    if !map.is_passable(end) {
        return PathResult::unreachable();
    }
    if start == end {
        return PathResult {
            path: vec![start],
            total_cost: Some(0),
            reachable: true,
        };
    }
    let budget = max_budget.unwrap_or(u32::MAX);

    let mut open = OpenSet::new();
    let mut came_from: BTreeMap<HexCoord, HexCoord> = BTreeMap::new();
    let mut g_score: BTreeMap<HexCoord, u32> = BTreeMap::new();
    let mut expanded = 0usize;

    g_score.insert(start, 0);
    open.push(start, 0, start.distance_to(end));

    while let Some(current) = open.pop() {
        if g_score
            .get(&current.coord)
            .is_some_and(|best| *best < current.g_score)
        {
            continue;
        }
        if current.coord == end {
            tracing::trace!(expanded, cost = current.g_score, "path found");
            return PathResult {
                path: reconstruct_path(&came_from, start, end),
                total_cost: Some(current.g_score),
                reachable: true,
            };
        }
        expanded += 1;

        for neighbor in current.coord.neighbors() {
            let Some(step) = map.movement_cost(neighbor) else {
                continue;
            };
            let tentative_g = current.g_score.saturating_add(step);
            if tentative_g > budget {
                continue;
            }
            if g_score.get(&neighbor).is_some_and(|g| *g <= tentative_g) {
                continue;
            }
            came_from.insert(neighbor, current.coord);
            g_score.insert(neighbor, tentative_g);
            let f = tentative_g.saturating_add(neighbor.distance_to(end));
            open.push(neighbor, tentative_g, f);
        }
    }

    tracing::trace!(expanded, %start, %end, "no path");
    PathResult::unreachable()
}

/// Every coordinate reachable from `start` within `budget`, mapped to its
/// minimal cost. The start is always present at cost 0.
pub fn reachable_tiles(
    map: &(impl TileLookup + ?Sized),
    start: HexCoord,
    budget: u32,
) -> BTreeMap<HexCoord, u32> {
    let mut best: BTreeMap<HexCoord, u32> = BTreeMap::new();
    let mut open = OpenSet::new();

    best.insert(start, 0);
    open.push(start, 0, 0);

    while let Some(current) = open.pop() {
        if best
            .get(&current.coord)
            .is_some_and(|g| *g < current.g_score)
        {
            continue;
        }
        for neighbor in current.coord.neighbors() {
            let Some(step) = map.movement_cost(neighbor) else {
                continue;
            };
            let cost = current.g_score.saturating_add(step);
            if cost > budget {
                continue;
            }
            if best.get(&neighbor).is_some_and(|g| *g <= cost) {
                continue;
            }
            best.insert(neighbor, cost);
            open.push(neighbor, cost, cost);
        }
    }

    best
}

/// Walk the parent links back from `end`.
fn reconstruct_path(
    came_from: &BTreeMap<HexCoord, HexCoord>,
    start: HexCoord,
    end: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(prev) => {
                path.push(*prev);
                current = *prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileMap;
    use crate::tile::{Terrain, Tile, TileFeature};

    fn strip() -> TileMap {
        TileMap::strip(4, Terrain::Grassland)
    }

    #[test]
    fn test_simple_path() {
        let result = find_path(&strip(), HexCoord::new(0, 0), HexCoord::new(3, 0), None);
        assert!(result.reachable);
        assert_eq!(result.total_cost, Some(3));
        assert_eq!(result.path.len(), 4);
        assert_eq!(result.path.first(), Some(&HexCoord::new(0, 0)));
        assert_eq!(result.path.last(), Some(&HexCoord::new(3, 0)));
    }

    #[test]
    fn test_path_to_same_cell() {
        let result = find_path(&strip(), HexCoord::new(1, 0), HexCoord::new(1, 0), Some(0));
        assert_eq!(result.path, vec![HexCoord::new(1, 0)]);
        assert_eq!(result.total_cost, Some(0));
        assert!(result.reachable);
    }

    #[test]
    fn test_impassable_goal() {
        let map = strip()
            .with_tile(Tile::new(HexCoord::new(3, 0), Terrain::Ocean))
            .unwrap();
        let result = find_path(&map, HexCoord::new(0, 0), HexCoord::new(3, 0), None);
        assert_eq!(result, PathResult::unreachable());
        // Even from the goal itself
        let result = find_path(&map, HexCoord::new(3, 0), HexCoord::new(3, 0), None);
        assert!(!result.reachable);
    }

    #[test]
    fn test_off_map_goal() {
        let result = find_path(&strip(), HexCoord::new(0, 0), HexCoord::new(10, 10), None);
        assert!(!result.reachable);
        assert!(result.path.is_empty());
        assert_eq!(result.total_cost, None);
    }

    #[test]
    fn test_no_path_exists() {
        let map = strip()
            .with_tile(Tile::new(HexCoord::new(1, 0), Terrain::Mountain))
            .unwrap();
        let result = find_path(&map, HexCoord::new(0, 0), HexCoord::new(3, 0), None);
        assert!(!result.reachable);
        assert!(result.path.is_empty());
    }

    #[test]
    fn test_path_around_obstacle() {
        let map = TileMap::rectangle(4, 3, Terrain::Grassland)
            .with_tile(Tile::new(HexCoord::new(1, 1), Terrain::Mountain))
            .unwrap()
            .with_tile(Tile::new(HexCoord::new(2, 1), Terrain::Lake))
            .unwrap();
        let result = find_path(&map, HexCoord::new(0, 1), HexCoord::new(3, 1), None);
        assert!(result.reachable);
        assert!(result.path.iter().all(|c| map.is_passable(*c)));
        for pair in result.path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
        assert_eq!(result.total_cost, Some(result.path.len() as u32 - 1));
    }

    #[test]
    fn test_budget_limits_search() {
        let result = find_path(&strip(), HexCoord::new(0, 0), HexCoord::new(3, 0), Some(2));
        assert!(!result.reachable);
        let result = find_path(&strip(), HexCoord::new(0, 0), HexCoord::new(3, 0), Some(3));
        assert!(result.reachable);
    }

    #[test]
    fn test_slow_terrain_is_avoided() {
        let map = TileMap::rectangle(3, 2, Terrain::Grassland)
            .with_tile(Tile::new(HexCoord::new(1, 0), Terrain::Grassland).with_feature(TileFeature::Forest))
            .unwrap()
            .with_tile(Tile::new(HexCoord::new(2, 0), Terrain::Grassland).with_feature(TileFeature::Marsh))
            .unwrap();
        let result = find_path(&map, HexCoord::new(0, 0), HexCoord::new(2, 1), None);
        assert_eq!(result.total_cost, Some(3));
        assert!(!result.path.contains(&HexCoord::new(1, 0)));
    }

    #[test]
    fn test_determinism() {
        let map = TileMap::rectangle(8, 8, Terrain::Plains);
        let first = find_path(&map, HexCoord::new(0, 0), HexCoord::new(7, 7), None);
        for _ in 0..10 {
            assert_eq!(
                find_path(&map, HexCoord::new(0, 0), HexCoord::new(7, 7), None),
                first
            );
        }
    }

    #[test]
    fn test_reachable_tiles_on_strip() {
        let reach = reachable_tiles(&strip(), HexCoord::new(0, 0), 2);
        assert_eq!(
            reach.into_iter().collect::<Vec<_>>(),
            vec![
                (HexCoord::new(0, 0), 0),
                (HexCoord::new(1, 0), 1),
                (HexCoord::new(2, 0), 2)
            ]
        );
    }

    #[test]
    fn test_reachable_tiles_zero_budget() {
        let reach = reachable_tiles(&strip(), HexCoord::new(2, 0), 0);
        assert_eq!(reach.len(), 1);
        assert_eq!(reach.get(&HexCoord::new(2, 0)), Some(&0));
    }

    #[test]
    fn test_reachable_costs_are_minimal() {
        let map = TileMap::rectangle(4, 4, Terrain::Grassland)
            .with_tile(Tile::new(HexCoord::new(1, 0), Terrain::GrasslandHill))
            .unwrap();
        let reach = reachable_tiles(&map, HexCoord::new(0, 0), 3);
        for (coord, cost) in &reach {
            let path = find_path(&map, HexCoord::new(0, 0), *coord, None);
            assert_eq!(path.total_cost, Some(*cost), "{coord}");
        }
        assert_eq!(reach.get(&HexCoord::new(1, 0)), Some(&2));
    }
}
