/*!
# Adjacency Maps

[`AdjacencyMap`] is a growable directed graph over arbitrary hashable vertex handles, for graphs
that are not index-dense. Edges are explicit `(tail, head)` pairs, so resolving an edge never
needs a lookup. Vertices that were never added have no out-edges.

```
use utraverse::prelude::*;

let graph: AdjacencyMap<&str> = [("a", "b"), ("b", "c")].into_iter().collect();
assert_eq!(graph.vertex_count(), 3);
assert_eq!(graph.successors_of("a").collect::<Vec<_>>(), vec!["b"]);
assert_eq!(graph.out_edges_of("z").count(), 0);
```
*/

use std::{hash::Hash, slice::Iter};

use fxhash::FxHashMap;

use super::*;

/// Directed multigraph storing, per vertex, the heads of its out-edges.
#[derive(Debug, Clone)]
pub struct AdjacencyMap<V> {
    out_heads: FxHashMap<V, Vec<V>>,
    number_of_edges: usize,
}

impl<V> Default for AdjacencyMap<V> {
    fn default() -> Self {
        Self {
            out_heads: FxHashMap::default(),
            number_of_edges: 0,
        }
    }
}

impl<V> AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `u` as an isolated vertex if it is not a vertex yet
    pub fn add_vertex(&mut self, u: V) {
        self.out_heads.entry(u).or_default();
    }

    /// Adds the edge `(tail, head)`, adding its endpoints as vertices if needed
    pub fn add_edge(&mut self, tail: V, head: V) {
        self.add_vertex(head);
        self.out_heads.entry(tail).or_default().push(head);
        self.number_of_edges += 1;
    }

    /// Returns the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.out_heads.len()
    }

    /// Returns the number of edges
    pub fn edge_count(&self) -> usize {
        self.number_of_edges
    }

    /// Returns *true* if `u` is a vertex
    pub fn contains_vertex(&self, u: V) -> bool {
        self.out_heads.contains_key(&u)
    }

    /// Returns an iterator over all vertices in unspecified order
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.out_heads.keys().copied()
    }
}

impl<V> GraphBase for AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    type Vertex = V;
    type Edge = (V, V);
}

/// Iterator over the out-edges of one vertex of an [`AdjacencyMap`]
pub struct AdjacencyEdges<'a, V> {
    tail: V,
    heads: Iter<'a, V>,
}

impl<V: Copy> Iterator for AdjacencyEdges<'_, V> {
    type Item = (V, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heads.next().map(|&head| (self.tail, head))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heads.size_hint()
    }
}

impl<V> OutEdges for AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    type OutEdgeIter<'a>
        = AdjacencyEdges<'a, V>
    where
        Self: 'a;

    fn out_edges_of(&self, u: V) -> Self::OutEdgeIter<'_> {
        AdjacencyEdges {
            tail: u,
            heads: self
                .out_heads
                .get(&u)
                .map(|heads| heads.iter())
                .unwrap_or_default(),
        }
    }

    fn out_degree_of(&self, u: V) -> usize {
        self.out_heads.get(&u).map_or(0, Vec::len)
    }
}

impl<V> EdgeHeads for AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    #[inline]
    fn try_head(&self, e: (V, V)) -> Option<V> {
        Some(e.1)
    }
}

impl<V> EdgeTails for AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    #[inline]
    fn try_tail(&self, e: (V, V)) -> Option<V> {
        Some(e.0)
    }
}

impl<V> FromIterator<(V, V)> for AdjacencyMap<V>
where
    V: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (V, V)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (u, v) in iter {
            graph.add_edge(u, v);
        }
        graph
    }
}
