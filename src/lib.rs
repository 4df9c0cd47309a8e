/*!
`utraverse` is a traversal engine for directed graphs whose vertices are either
- index-dense: numbered `0` to `n - 1` as `u32`, stored compactly in a [`CsrGraph`](crate::repr::CsrGraph), or
- opaque: any `Copy + Eq + Hash` handle, stored in an [`AdjacencyMap`](crate::repr::AdjacencyMap).

# Representation

Index-dense **nodes** are `u32` in the range `0..n`; most graphs do not exceed `2^32` nodes and
this halves every per-vertex buffer compared to `usize`.
**Edges** of a [`CsrGraph`](crate::repr::CsrGraph) are dense ids (`EdgeId = u32`) into parallel
tail/head arrays; [`Edge(Node, Node)`](crate::Edge) is the value form used as builder input.

A `CsrGraph` is built once through a [`CsrGraphBuilder`](crate::repr::CsrGraphBuilder) and is
read-only afterwards. Building is a single counting sort by tail, so the out-edges of a vertex
keep their insertion order.

# Design

The engine only talks to graphs through the capability traits in [`ops`] (out-edges of a
vertex, head of an edge, optionally a dense vertex count). All algorithms are provided as
configurable structs that one can alter using the *Setter* pattern before calling the
configured algorithm on a provided graph; the most common uses are also available as methods
via [`Traversal`](crate::algo::Traversal).

Transient buffers such as color maps and explored bitsets can be rented from a
[`Pool`](crate::utils::Pool) and are returned on every exit path.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes nodes, edges, the capability traits, both representations, and all traversal engines,
- [`algo`] includes DFS (recursive, eager, lazy), BFS (eager, lazy), the generic frontier search and cooperative cancellation,
- [`heap`] includes the indexed d-ary heap behind best-first search,
- [`utils`] includes colors, sets, maps and the scratch pool.

In most use-cases, `use utraverse::prelude::*;` suffices for your needs.

```
use utraverse::prelude::*;

let graph = CsrGraph::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);

let mut events: Vec<DfsEvent<Node, EdgeId>> = Vec::new();
EagerDfs::new().traverse(&graph, 0, vec![Color::None; graph.len()], &mut events);
assert!(events.contains(&DfsEvent::BackEdge(2)));

assert_eq!(graph.topological_order(), None);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod heap;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use error::{GraphError, Result};
pub use node::*;

/// `utraverse::prelude` includes nodes and edges, all capability traits, both graph representations and all traversal engines.
pub mod prelude {
    pub use super::{
        algo::*,
        edge::*,
        error::GraphError,
        heap::IndexedDaryHeap,
        node::*,
        ops::*,
        repr::*,
        utils::{Color, ColorMap, Map, NodeSet, Pool, Pooled, Recycle, Set},
    };
}
