//! Random inputs shared by the test modules.

use itertools::Itertools;
use rand::Rng;

use crate::{prelude::*, *};

/// Creates `m` random edges over vertices `0..n`; loops and parallel edges included
pub fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges) -> Vec<Edge> {
    (0..m)
        .map(|_| Edge(rng.random_range(0..n), rng.random_range(0..n)))
        .collect_vec()
}

/// Creates a random graph with exactly `n` vertices and `m` edges
pub fn random_graph<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges) -> CsrGraph {
    let mut builder = CsrGraphBuilder::with_capacity(n, m as usize);
    builder.ensure_vertex_count(n);
    builder.extend(random_edges(rng, n, m));
    builder.build()
}

/// Hop distance from `source` to every vertex (`None` if unreachable), by repeated relaxation
pub fn hop_distances(graph: &CsrGraph, source: Node) -> Vec<Option<NumNodes>> {
    let mut dist = vec![None; graph.len()];
    dist[source as usize] = Some(0);

    let mut changed = true;
    while changed {
        changed = false;
        for Edge(u, v) in graph.edges() {
            let Some(du) = dist[u as usize] else {
                continue;
            };
            if dist[v as usize].is_none_or(|dv| du + 1 < dv) {
                dist[v as usize] = Some(du + 1);
                changed = true;
            }
        }
    }

    dist
}
