/*!
# Graph Capabilities

The traversal engine never names a concrete graph type. It consumes a handful of small
capability traits and is monomorphized over them, so enumerating the out-edges of a vertex
costs no allocation and no dynamic dispatch:

- [`OutEdges`]: enumerate the out-edges of a vertex (restartable: just call it again),
- [`EdgeHeads`]: resolve an edge to its head,
- [`EdgeTails`]: resolve an edge to its tail.

[`IncidenceGraph`] bundles the first two and is what every traversal requires.
Index-dense graphs additionally implement [`GraphNodeOrder`] and [`GraphEdgeOrder`].
*/

use crate::*;

/// Associates the vertex and edge types of a graph.
pub trait GraphBase {
    /// Vertex handle; `Node` for index-dense graphs
    type Vertex: Copy + Eq;

    /// Edge handle; an id into parallel arrays or an explicit `(tail, head)` pair
    type Edge: Copy;
}

/// Provides the out-edges of a vertex.
pub trait OutEdges: GraphBase {
    /// Iterator over the out-edges of a single vertex
    type OutEdgeIter<'a>: Iterator<Item = Self::Edge> + 'a
    where
        Self: 'a;

    /// Returns the out-edges of `u`.
    /// Yields nothing if `u` is not a vertex of the graph.
    fn out_edges_of(&self, u: Self::Vertex) -> Self::OutEdgeIter<'_>;

    /// Returns the number of out-edges of `u` (`0` if `u` is not a vertex of the graph)
    fn out_degree_of(&self, u: Self::Vertex) -> usize {
        self.out_edges_of(u).count()
    }
}

/// Resolves edges to their heads.
pub trait EdgeHeads: GraphBase {
    /// Returns the head of `e`, or `None` if `e` is not an edge of the graph
    fn try_head(&self, e: Self::Edge) -> Option<Self::Vertex>;
}

/// Resolves edges to their tails.
pub trait EdgeTails: GraphBase {
    /// Returns the tail of `e`, or `None` if `e` is not an edge of the graph
    fn try_tail(&self, e: Self::Edge) -> Option<Self::Vertex>;
}

/// Everything a traversal needs: out-edges plus head resolution.
pub trait IncidenceGraph: OutEdges + EdgeHeads {
    /// Returns an iterator over the heads of all out-edges of `u`.
    /// Edges whose head cannot be resolved are skipped.
    fn successors_of(&self, u: Self::Vertex) -> impl Iterator<Item = Self::Vertex> + '_ {
        self.out_edges_of(u).filter_map(|e| self.try_head(e))
    }
}

impl<G> IncidenceGraph for G where G: OutEdges + EdgeHeads {}

/// Provides getters pertaining to the vertex-size of an index-dense graph
pub trait GraphNodeOrder: GraphBase<Vertex = Node> {
    /// Returns the number of vertices of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of vertices as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no vertices (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> std::ops::Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns empty bitset with one entry per vertex
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_edgeless(&self) -> bool {
        self.number_of_edges() == 0
    }
}
