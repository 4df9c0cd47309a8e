/*!
# Compressed Sparse Row (CSR) Graph

[`CsrGraph`] is the compact, immutable form of a directed multigraph with dense vertex ids
`0..vertex_count` and dense edge ids `0..edge_count`:

- `tails[e]` / `heads[e]`: endpoints of edge `e`, in insertion order,
- `edges_ordered_by_tail`: a permutation of all edge ids in which edges sharing a tail are
  contiguous,
- `upper_bound_by_vertex[u]`: exclusive end of the run of `u` within `edges_ordered_by_tail`
  (its start is the upper bound of `u - 1`, or `0`).

Graphs are built once through a [`CsrGraphBuilder`] and are read-only afterwards. Querying a
vertex or edge id that does not exist is not an error: [`CsrGraph::out_edges_of`] returns an
empty slice and [`EdgeHeads::try_head`] / [`EdgeTails::try_tail`] return `None`.

```
use utraverse::prelude::*;

let graph = CsrGraph::from_edges([(1, 2), (0, 1), (1, 0)]);
assert_eq!(graph.vertex_count(), 3);
assert_eq!(graph.out_edges_of(1), &[0, 2]);
assert_eq!(graph.try_head(2), Some(0));
assert!(graph.out_edges_of(42).is_empty());
assert_eq!(graph.try_tail(42), None);
```
*/

use std::{iter::Copied, slice::Iter};

use super::*;
use crate::utils::sliced_buffer::SlicedBuffer;

/// Immutable directed graph in CSR layout with out-edges grouped by tail.
#[derive(Debug, Clone, Default)]
pub struct CsrGraph {
    out_edges: SlicedBuffer<EdgeId, EdgeId>,
    tails: Vec<Node>,
    heads: Vec<Node>,
}

impl CsrGraph {
    /// Assembles a graph from its parts; `out_edges` must group `0..tails.len()` by tail
    pub(super) fn from_raw_parts(
        out_edges: SlicedBuffer<EdgeId, EdgeId>,
        tails: Vec<Node>,
        heads: Vec<Node>,
    ) -> Self {
        Self {
            out_edges,
            tails,
            heads,
        }
    }

    /// Builds a graph from a sequence of `(tail, head)` pairs.
    /// Edge ids follow the order of the sequence; the vertex count is `max endpoint + 1`.
    ///
    /// # Panics
    /// Panics if an endpoint is [`INVALID_NODE`].
    pub fn from_edges<I, E>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        edges
            .into_iter()
            .map(Into::<Edge>::into)
            .collect::<CsrGraphBuilder>()
            .build()
    }

    /// Returns the number of vertices
    #[inline]
    pub fn vertex_count(&self) -> NumNodes {
        self.out_edges.len() as NumNodes
    }

    /// Returns the number of edges (parallel edges and loops included)
    #[inline]
    pub fn edge_count(&self) -> NumEdges {
        self.tails.len() as NumEdges
    }

    /// Returns the ids of all out-edges of `u` in insertion order;
    /// empty if `u` is not a vertex.
    #[inline]
    pub fn out_edges_of(&self, u: Node) -> &[EdgeId] {
        self.out_edges.get(u).unwrap_or(&[])
    }

    /// Returns edge `e` as a `(tail, head)` value, or `None` if there is no such edge
    #[inline]
    pub fn edge(&self, e: EdgeId) -> Option<Edge> {
        let e = e as usize;
        Some(Edge(*self.tails.get(e)?, *self.heads.get(e)?))
    }

    /// Returns an iterator over all edges as `(tail, head)` values in id order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.tails
            .iter()
            .zip(&self.heads)
            .map(|(&u, &v)| Edge(u, v))
    }

    /// Per vertex, the exclusive end of its run within [`CsrGraph::edges_ordered_by_tail`]
    pub fn upper_bound_by_vertex(&self) -> &[EdgeId] {
        &self.out_edges.raw_offset_slice()[1..]
    }

    /// All edge ids, grouped by tail
    pub fn edges_ordered_by_tail(&self) -> &[EdgeId] {
        self.out_edges.raw_buffer_slice()
    }

    /// Tail of every edge, indexed by edge id
    pub fn tails(&self) -> &[Node] {
        &self.tails
    }

    /// Head of every edge, indexed by edge id
    pub fn heads(&self) -> &[Node] {
        &self.heads
    }

    /// Checks the structural invariants of the layout.
    ///
    /// Succeeds iff endpoints are vertices, `edges_ordered_by_tail` is a permutation of all
    /// edge ids and every run holds exactly the edges of its tail.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertex_count();
        let m = self.tails.len();

        if self.heads.len() != m {
            return Err(GraphError::InvalidCsr(format!(
                "{} tails but {} heads",
                m,
                self.heads.len()
            )));
        }

        if self.out_edges.number_of_entries() != m {
            return Err(GraphError::InvalidCsr(format!(
                "{} edges grouped by tail, expected {m}",
                self.out_edges.number_of_entries()
            )));
        }

        if let Some(e) = (0..m).find(|&e| self.tails[e] >= n || self.heads[e] >= n) {
            return Err(GraphError::InvalidCsr(format!(
                "edge {e} = {} has an endpoint outside of 0..{n}",
                Edge(self.tails[e], self.heads[e])
            )));
        }

        let mut seen = NodeBitSet::new(m as Node);
        for u in 0..n {
            for &e in self.out_edges_of(u) {
                if (e as usize) >= m || seen.set_bit(e) {
                    return Err(GraphError::InvalidCsr(format!(
                        "edge id {e} is out of range or listed twice"
                    )));
                }

                if self.tails[e as usize] != u {
                    return Err(GraphError::InvalidCsr(format!(
                        "edge {e} has tail {} but is listed under vertex {u}",
                        self.tails[e as usize]
                    )));
                }
            }
        }

        Ok(())
    }
}

impl GraphBase for CsrGraph {
    type Vertex = Node;
    type Edge = EdgeId;
}

impl OutEdges for CsrGraph {
    type OutEdgeIter<'a>
        = Copied<Iter<'a, EdgeId>>
    where
        Self: 'a;

    #[inline]
    fn out_edges_of(&self, u: Node) -> Self::OutEdgeIter<'_> {
        CsrGraph::out_edges_of(self, u).iter().copied()
    }

    #[inline]
    fn out_degree_of(&self, u: Node) -> usize {
        self.out_edges.size_of(u)
    }
}

impl EdgeHeads for CsrGraph {
    #[inline]
    fn try_head(&self, e: EdgeId) -> Option<Node> {
        self.heads.get(e as usize).copied()
    }
}

impl EdgeTails for CsrGraph {
    #[inline]
    fn try_tail(&self, e: EdgeId) -> Option<Node> {
        self.tails.get(e as usize).copied()
    }
}

impl GraphNodeOrder for CsrGraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.vertex_count()
    }
}

impl GraphEdgeOrder for CsrGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.edge_count()
    }
}
