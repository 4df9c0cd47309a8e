/*!
# Building CSR Graphs

[`CsrGraphBuilder`] accumulates `(tail, head)` pairs and freezes them into a [`CsrGraph`] with
a single consuming [`CsrGraphBuilder::build`]. Out-degrees are counted while edges are added,
so materialization is a prefix sum followed by at most one counting-sort pass:

- tails appended in non-decreasing order: edge ids already are grouped by tail, and the
  identity permutation is used,
- otherwise: a stable counting sort by tail, keeping insertion order within each run.

Both paths are `O(V + E)`.

```
use utraverse::prelude::*;

let mut builder = CsrGraphBuilder::new();
assert_eq!(builder.try_add_edge(0, 2), Ok(0));
assert!(builder.try_add_edge(-1, 2).is_err());
builder.extend([(2, 1), (1, 0)]);

let graph = builder.build();
assert_eq!(graph.vertex_count(), 3);
assert_eq!(graph.edge_count(), 3);
```
*/

use std::fmt::Display;

use num::ToPrimitive;

use super::*;
use crate::utils::sliced_buffer::SlicedBuffer;

/// Mutable accumulator of edges; see the [module documentation](self).
#[derive(Debug, Clone)]
pub struct CsrGraphBuilder {
    out_degrees: Vec<NumEdges>,
    tails: Vec<Node>,
    heads: Vec<Node>,
    tails_sorted: bool,
}

impl Default for CsrGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrGraphBuilder {
    /// Largest number of edges a graph can hold
    pub const MAX_EDGES: usize = EdgeId::MAX as usize;

    /// Creates an empty builder
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Creates an empty builder with room for `vertices` vertices and `edges` edges
    pub fn with_capacity(vertices: NumNodes, edges: usize) -> Self {
        Self {
            out_degrees: Vec::with_capacity(vertices as usize),
            tails: Vec::with_capacity(edges),
            heads: Vec::with_capacity(edges),
            tails_sorted: true,
        }
    }

    /// Creates an empty builder whose graph has at least `n` vertices, isolated unless edges
    /// are added to them.
    ///
    /// Fails with [`GraphError::InvalidVertexCount`] if `n` is negative or not representable.
    pub fn try_with_vertex_count<T>(n: T) -> Result<Self>
    where
        T: ToPrimitive + Display,
    {
        let count = n
            .to_u32()
            .ok_or_else(|| GraphError::InvalidVertexCount(n.to_string()))?;

        let mut builder = Self::with_capacity(count, 0);
        builder.ensure_vertex_count(count);
        Ok(builder)
    }

    /// Grows the vertex count to at least `n`
    pub fn ensure_vertex_count(&mut self, n: NumNodes) {
        if (n as usize) > self.out_degrees.len() {
            self.out_degrees.resize(n as usize, 0);
        }
    }

    /// Returns the number of vertices added so far (`max endpoint + 1`, or more if raised by
    /// [`CsrGraphBuilder::ensure_vertex_count`])
    pub fn vertex_count(&self) -> NumNodes {
        self.out_degrees.len() as NumNodes
    }

    /// Returns the number of edges added so far
    pub fn edge_count(&self) -> NumEdges {
        self.tails.len() as NumEdges
    }

    /// Appends the edge `(tail, head)` and returns its id.
    ///
    /// # Panics
    /// Panics if an endpoint is [`INVALID_NODE`] or the graph already holds
    /// [`CsrGraphBuilder::MAX_EDGES`] edges.
    pub fn add_edge(&mut self, tail: Node, head: Node) -> EdgeId {
        assert!(
            tail != INVALID_NODE && head != INVALID_NODE,
            "edge ({tail},{head}) has an invalid endpoint"
        );
        assert!(
            self.tails.len() < Self::MAX_EDGES,
            "at most {} edges are supported",
            Self::MAX_EDGES
        );

        self.push_edge(tail, head)
    }

    /// Appends the edge `(tail, head)` and returns its id.
    ///
    /// Fails without modifying the builder if an endpoint is negative or not a representable
    /// vertex id, or if the edge limit is reached.
    pub fn try_add_edge<T>(&mut self, tail: T, head: T) -> Result<EdgeId>
    where
        T: ToPrimitive + Display,
    {
        let tail = Self::to_vertex(tail)?;
        let head = Self::to_vertex(head)?;

        if self.tails.len() >= Self::MAX_EDGES {
            return Err(GraphError::TooManyEdges {
                max: Self::MAX_EDGES as u64,
            });
        }

        Ok(self.push_edge(tail, head))
    }

    /// Freezes the accumulated edges into a [`CsrGraph`].
    pub fn build(self) -> CsrGraph {
        let Self {
            out_degrees,
            tails,
            heads,
            tails_sorted,
        } = self;

        let mut upper_bounds: Vec<EdgeId> = Vec::with_capacity(out_degrees.len() + 1);
        upper_bounds.push(0);
        let mut total: EdgeId = 0;
        for degree in out_degrees {
            total += degree;
            upper_bounds.push(total);
        }

        let ordered: Vec<EdgeId> = if tails_sorted {
            (0..tails.len() as EdgeId).collect()
        } else {
            let mut cursor = upper_bounds[..upper_bounds.len() - 1].to_vec();
            let mut ordered = vec![0 as EdgeId; tails.len()];
            for (e, &u) in tails.iter().enumerate() {
                let slot = &mut cursor[u as usize];
                ordered[*slot as usize] = e as EdgeId;
                *slot += 1;
            }
            ordered
        };

        tracing::debug!(
            vertices = upper_bounds.len() - 1,
            edges = tails.len(),
            sorted_input = tails_sorted,
            "materialized CSR graph"
        );

        let out_edges = SlicedBuffer::new(ordered, upper_bounds);
        let graph = CsrGraph::from_raw_parts(out_edges, tails, heads);
        debug_assert!(graph.validate().is_ok());
        graph
    }

    fn to_vertex<T>(x: T) -> Result<Node>
    where
        T: ToPrimitive + Display,
    {
        match x.to_u32() {
            Some(u) if u != INVALID_NODE => Ok(u),
            _ => Err(GraphError::InvalidVertex(x.to_string())),
        }
    }

    fn push_edge(&mut self, tail: Node, head: Node) -> EdgeId {
        let id = self.tails.len() as EdgeId;

        if self.tails.last().is_some_and(|&last| last > tail) {
            self.tails_sorted = false;
        }

        self.ensure_vertex_count(tail.max(head) + 1);
        self.out_degrees[tail as usize] += 1;
        self.tails.push(tail);
        self.heads.push(head);

        id
    }
}

impl Extend<(Node, Node)> for CsrGraphBuilder {
    fn extend<I: IntoIterator<Item = (Node, Node)>>(&mut self, iter: I) {
        for (u, v) in iter {
            self.add_edge(u, v);
        }
    }
}

impl Extend<Edge> for CsrGraphBuilder {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(<(Node, Node)>::from));
    }
}

impl FromIterator<(Node, Node)> for CsrGraphBuilder {
    fn from_iter<I: IntoIterator<Item = (Node, Node)>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

impl FromIterator<Edge> for CsrGraphBuilder {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn vertex_count_grows_with_endpoints() {
        let mut builder = CsrGraphBuilder::new();
        assert_eq!(builder.vertex_count(), 0);

        assert_eq!(builder.add_edge(0, 4), 0);
        assert_eq!(builder.vertex_count(), 5);
        assert_eq!(builder.add_edge(2, 1), 1);
        assert_eq!(builder.vertex_count(), 5);
        builder.ensure_vertex_count(8);
        assert_eq!(builder.vertex_count(), 8);
        assert_eq!(builder.edge_count(), 2);

        let graph = builder.build();
        assert_eq!(graph.vertex_count(), 8);
        assert!(graph.out_edges_of(7).is_empty());
    }

    #[test]
    fn negative_endpoints_are_rejected_without_mutation() {
        let mut builder = CsrGraphBuilder::new();
        builder.try_add_edge(1i64, 2).unwrap();

        assert!(matches!(
            builder.try_add_edge(-1i64, 0),
            Err(GraphError::InvalidVertex(_))
        ));
        assert!(matches!(
            builder.try_add_edge(7i64, -3),
            Err(GraphError::InvalidVertex(_))
        ));
        assert!(matches!(
            builder.try_add_edge(0u64, u64::MAX),
            Err(GraphError::InvalidVertex(_))
        ));

        assert_eq!(builder.edge_count(), 1);
        assert_eq!(builder.vertex_count(), 3);

        let graph = builder.build();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(1, 2)]);
    }

    #[test]
    fn invalid_vertex_count() {
        assert!(matches!(
            CsrGraphBuilder::try_with_vertex_count(-5),
            Err(GraphError::InvalidVertexCount(_))
        ));

        let builder = CsrGraphBuilder::try_with_vertex_count(4usize).unwrap();
        assert_eq!(builder.vertex_count(), 4);
        assert_eq!(builder.build().vertex_count(), 4);
    }

    #[test]
    #[should_panic]
    fn invalid_node_panics() {
        CsrGraphBuilder::new().add_edge(0, INVALID_NODE);
    }

    #[test]
    fn sortedness_is_tracked() {
        let sorted: CsrGraphBuilder = [(0, 1), (0, 2), (1, 0), (3, 3)].into_iter().collect();
        assert!(sorted.tails_sorted);
        let graph = sorted.build();
        assert_eq!(graph.edges_ordered_by_tail(), &[0, 1, 2, 3]);

        let unsorted: CsrGraphBuilder = [Edge(1, 0), Edge(0, 1), Edge(1, 2), Edge(0, 2)]
            .into_iter()
            .collect();
        assert!(!unsorted.tails_sorted);
        let graph = unsorted.build();
        assert_eq!(graph.edges_ordered_by_tail(), &[1, 3, 0, 2]);
        assert_eq!(graph.upper_bound_by_vertex(), &[2, 4, 4]);
    }
}
