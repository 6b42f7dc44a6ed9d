//! Pathfinding benchmarks for civ_core.
//!
//! Run with: `cargo bench -p civ_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use civ_core::hex::HexCoord;
use civ_core::map::TileMap;
use civ_core::pathfinding::{find_path, reachable_tiles};
use civ_core::tile::{Terrain, Tile, TileFeature};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Grassland with every third column forested and a mountain wall that
/// leaves one gap, so searches have to route around it.
fn mixed_map(size: u32) -> TileMap {
    let mut map = TileMap::rectangle(size, size, Terrain::Grassland);
    let side = i32::try_from(size).unwrap_or(i32::MAX);
    for r in 0..side {
        for q in (0..side).step_by(3) {
            let coord = HexCoord::new(q, r);
            let _ = map.insert(Tile::new(coord, Terrain::Grassland).with_feature(TileFeature::Forest));
        }
    }
    let wall = side / 2;
    for r in 1..side {
        let _ = map.insert(Tile::new(HexCoord::new(wall, r), Terrain::Mountain));
    }
    map
}

pub fn find_path_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");
    for size in [16u32, 32, 64] {
        let map = mixed_map(size);
        let last = i32::try_from(size).unwrap_or(i32::MAX) - 1;
        let goal = HexCoord::new(last, last);
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| find_path(black_box(map), HexCoord::ORIGIN, goal, None));
        });
    }
    group.finish();
}

pub fn reachable_benchmark(c: &mut Criterion) {
    let map = mixed_map(64);
    let centre = HexCoord::new(16, 32);
    let mut group = c.benchmark_group("reachable_tiles");
    for budget in [2u32, 6, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(budget), &budget, |b, budget| {
            b.iter(|| reachable_tiles(black_box(&map), centre, *budget));
        });
    }
    group.finish();
}

criterion_group!(benches, find_path_benchmark, reachable_benchmark);
criterion_main!(benches);
