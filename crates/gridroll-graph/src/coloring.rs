//! Proper-coloring heuristics for the conflict graph.
//!
//! Three independent algorithms share one contract: the color classes
//! partition the vertex set, no edge is monochromatic, and the result
//! is fully determined by the adjacency (all ties broken by ascending
//! vertex index). None of them guarantees a minimum coloring; the
//! planner runs all three and keeps the smallest.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use gridroll_cluster::Ndx;

use crate::graph::ConflictGraph;

/// Color id → vertices of that color, ascending.
pub type ColorMap = BTreeMap<usize, Vec<Ndx>>;

/// Color count of one algorithm, for verbose reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ColoringStats {
    pub algorithm: &'static str,
    pub colors: usize,
}

/// The winning coloring plus per-algorithm statistics.
#[derive(Debug, Clone)]
pub struct BestColoring {
    pub algorithm: &'static str,
    pub coloring: ColorMap,
    pub stats: Vec<ColoringStats>,
}

fn smallest_free_color(used: &BTreeSet<usize>) -> usize {
    let mut color = 0;
    while used.contains(&color) {
        color += 1;
    }
    color
}

/// Color vertices in the given order, each getting the smallest color
/// unused among its already-colored neighbors.
fn greedy_assign(graph: &ConflictGraph, order: &[Ndx]) -> BTreeMap<Ndx, usize> {
    let mut assignment: BTreeMap<Ndx, usize> = BTreeMap::new();
    for &v in order {
        let used: BTreeSet<usize> = graph
            .neighbors(v)
            .filter_map(|n| assignment.get(&n).copied())
            .collect();
        assignment.insert(v, smallest_free_color(&used));
    }
    assignment
}

fn to_color_map(assignment: &BTreeMap<Ndx, usize>) -> ColorMap {
    let mut map = ColorMap::new();
    for (&v, &color) in assignment {
        map.entry(color).or_default().push(v);
    }
    map
}

/// Largest-First: vertices by descending degree, ties ascending index.
pub fn color_lf(graph: &ConflictGraph) -> ColorMap {
    let mut order: Vec<Ndx> = graph.vertices().collect();
    order.sort_by_key(|&v| (Reverse(graph.degree(v)), v));
    to_color_map(&greedy_assign(graph, &order))
}

/// DSATUR: repeatedly color the vertex with the most distinct neighbor
/// colors; ties by degree within the uncolored subgraph, then index.
pub fn color_dsatur(graph: &ConflictGraph) -> ColorMap {
    let mut assignment: BTreeMap<Ndx, usize> = BTreeMap::new();
    let mut uncolored: BTreeSet<Ndx> = graph.vertices().collect();

    while !uncolored.is_empty() {
        let mut best: Option<(usize, usize, Ndx)> = None;
        for &v in &uncolored {
            let saturation = graph
                .neighbors(v)
                .filter_map(|n| assignment.get(&n).copied())
                .collect::<BTreeSet<usize>>()
                .len();
            let degree = graph.neighbors(v).filter(|n| uncolored.contains(n)).count();
            // Strict comparisons keep the smallest index on full ties.
            let better = match best {
                None => true,
                Some((s, d, _)) => saturation > s || (saturation == s && degree > d),
            };
            if better {
                best = Some((saturation, degree, v));
            }
        }
        let Some((_, _, v)) = best else { break };

        let used: BTreeSet<usize> = graph
            .neighbors(v)
            .filter_map(|n| assignment.get(&n).copied())
            .collect();
        assignment.insert(v, smallest_free_color(&used));
        uncolored.remove(&v);
    }

    to_color_map(&assignment)
}

/// Recursive-largest-first: peel greedily-built maximal independent
/// sets off the uncolored subgraph, one fresh color each.
///
/// Set construction picks the max-degree vertex of the uncolored
/// subgraph (ties ascending index) and discards its neighbors from the
/// candidate pool until the pool is exhausted.
pub fn color_rlf(graph: &ConflictGraph) -> ColorMap {
    let mut assignment: BTreeMap<Ndx, usize> = BTreeMap::new();
    let mut remaining: BTreeSet<Ndx> = graph.vertices().collect();
    let mut color = 0;

    while !remaining.is_empty() {
        let mut candidates = remaining.clone();
        let mut class = Vec::new();

        while !candidates.is_empty() {
            let mut best: Option<(usize, Ndx)> = None;
            for &v in &candidates {
                let degree = graph.neighbors(v).filter(|n| remaining.contains(n)).count();
                let better = match best {
                    None => true,
                    Some((d, _)) => degree > d,
                };
                if better {
                    best = Some((degree, v));
                }
            }
            let Some((_, v)) = best else { break };

            class.push(v);
            candidates.remove(&v);
            for n in graph.neighbors(v) {
                candidates.remove(&n);
            }
        }

        for &v in &class {
            assignment.insert(v, color);
            remaining.remove(&v);
        }
        color += 1;
    }

    to_color_map(&assignment)
}

/// Run all three heuristics and keep the coloring with fewest colors.
///
/// Ties go to declaration order: LF, then DSATUR, then RLF.
pub fn best_coloring(graph: &ConflictGraph) -> BestColoring {
    let candidates: [(&'static str, ColorMap); 3] = [
        ("LF", color_lf(graph)),
        ("DSATUR", color_dsatur(graph)),
        ("RLF", color_rlf(graph)),
    ];

    let stats: Vec<ColoringStats> = candidates
        .iter()
        .map(|&(algorithm, ref map)| ColoringStats { algorithm, colors: map.len() })
        .collect();
    for s in &stats {
        debug!(algorithm = s.algorithm, colors = s.colors, "coloring candidate");
    }

    let mut winner: Option<(&'static str, ColorMap)> = None;
    for (algorithm, coloring) in candidates {
        let replace = match &winner {
            None => true,
            Some((_, best)) => coloring.len() < best.len(),
        };
        if replace {
            winner = Some((algorithm, coloring));
        }
    }

    // The candidate array is non-empty, so a winner always exists.
    let (algorithm, coloring) = winner.unwrap_or(("LF", ColorMap::new()));
    BestColoring { algorithm, coloring, stats }
}
