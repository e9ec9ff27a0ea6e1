//! Benchmark support utilities for the preparation pipeline.
//!
//! Generates deterministic grid networks and demand sets so that every run
//! prepares exactly the same instance.

use hosroute_core::{DemandRequest, MapNodeId, Minutes, TravelTimeError, TravelTimeGraph};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Side of the square grid the cities sit on.
const GRID_SIDE: u32 = 12;

/// Driving minutes between adjacent grid cells.
const MINUTES_PER_CELL: Minutes = 45;

/// Latest minute a pickup window may open.
const LATEST_OPENING: Minutes = 4 * 1440;

/// Travel times between every pair of `cities` grid cells, plus the depot at
/// cell zero.
///
/// Times are Manhattan distances scaled by [`MINUTES_PER_CELL`], with up to
/// a quarter added at random to break symmetry.
///
/// # Errors
///
/// Propagates [`TravelTimeError`] from the graph, which generated times
/// never trigger.
pub fn generate_travel_times(cities: u32, seed: u64) -> Result<TravelTimeGraph, TravelTimeError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut graph = TravelTimeGraph::new();
    for from in 0..=cities {
        for to in (0..=cities).filter(|&to| to != from) {
            let base = manhattan(from, to) * MINUTES_PER_CELL;
            let jitter = rng.gen_range(0..=base.div_euclid(4));
            graph.insert(MapNodeId(from), MapNodeId(to), base + jitter)?;
        }
    }
    Ok(graph)
}

/// `count` demands between random cities with pickup windows of six to
/// forty-eight hours.
#[must_use]
pub fn generate_demands(count: usize, cities: u32, seed: u64) -> Vec<DemandRequest> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    (0..count)
        .map(|_| {
            let from = rng.gen_range(1..=cities);
            let to = rng.gen_range(1..=cities);
            let early = rng.gen_range(0..=LATEST_OPENING);
            let width = rng.gen_range(360..=2880);
            DemandRequest::new(MapNodeId(from), MapNodeId(to), early, early + width)
        })
        .collect()
}

fn manhattan(a: u32, b: u32) -> Minutes {
    let (ax, ay) = (a.rem_euclid(GRID_SIDE), a.div_euclid(GRID_SIDE));
    let (bx, by) = (b.rem_euclid(GRID_SIDE), b.div_euclid(GRID_SIDE));
    Minutes::from(ax.abs_diff(bx) + ay.abs_diff(by))
}
