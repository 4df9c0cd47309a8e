/*!
# Vertex Representation

Index-dense graphs number their vertices `0..n` and we pick `Node = u32` for them:
almost no graph this crate is meant for exceeds `2^32` vertices, and a `u32` halves the
size of every color map, frontier and edge array compared to `usize`.

Graphs whose vertices are not index-dense (see [`AdjacencyMap`](crate::repr::AdjacencyMap))
use their own vertex type through [`GraphBase::Vertex`](crate::ops::GraphBase::Vertex).
*/

use std::num::NonZero;
use stream_bitset::bitset::BitSetImpl;

/// Vertices of index-dense graphs are unsigned integers from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Vertex value that is never a valid vertex id
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` vertices in an index-dense graph
pub type NumNodes = Node;

/// BitSet over vertices, the dense explored-set of choice
pub type NodeBitSet = BitSetImpl<Node>;

/// As `Option<Node>` uses additional bytes for padding, `Vec<Option<Node>>` wastes space.
/// This uses the `NonZero`-niche with the constant `N` as the `None`-value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// `INVALID_NODE` is the natural `None`-value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}
