use std::fmt::{Debug, Display};

use crate::Node;

/// An explicit edge given by its two endpoints `Edge(tail, head)`.
///
/// Compact graphs identify edges by an [`EdgeId`] instead and resolve endpoints
/// on demand; `Edge` is the value form used for builder input and for reporting.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// Dense edge id in `0..number_of_edges`, indexing the parallel head/tail arrays.
pub type EdgeId = NumEdges;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Returns the tail (source) of the edge
    pub fn tail(&self) -> Node {
        self.0
    }

    /// Returns the head (target) of the edge
    pub fn head(&self) -> Node {
        self.1
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

impl From<Edge> for (Node, Node) {
    fn from(value: Edge) -> Self {
        (value.0, value.1)
    }
}
