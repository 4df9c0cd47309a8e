/*!
# Traversal Engine

Depth-first search in three strategies ([`RecursiveDfs`], [`EagerDfs`], [`LazyDfs`]),
breadth-first search ([`EagerBfs`], [`LazyBfs`]) and a frontier-driven [`GenericSearch`] that
both are special cases of. All of them are generic over the capability traits in
[`ops`](crate::ops) and never assume a concrete graph representation.

Every engine is a small configurable struct (set a cancellation token with
`with_cancellation`, then run it on a graph). Eager forms report to a handler; lazy forms are
iterators that advance one unit of work per pull. For index-dense graphs, the [`Traversal`]
trait exposes the common cases directly as methods:
```rust
use utraverse::prelude::*;

let g = CsrGraph::from_edges([(0, 1), (1, 2)]);
assert_eq!(g.bfs(0).finished_vertices().collect::<Vec<_>>(), vec![0, 1, 2]);
```
*/

mod bfs;
mod cancel;
mod dfs;
mod search;
mod traversal;

use crate::{prelude::*, utils::*};

pub use bfs::*;
pub use cancel::*;
pub use dfs::*;
pub use search::*;
pub use traversal::*;
