/*!
# Graph Representations

- [`CsrGraph`]: compact immutable graph over dense vertex and edge ids, built with a
  [`CsrGraphBuilder`],
- [`AdjacencyMap`]: growable map-backed graph over opaque vertex handles.

Both only expose the capability traits of [`ops`](crate::ops); the traversals in
[`algo`](crate::algo) never depend on either layout.
*/

use crate::{ops::*, *};

mod adjacency;
mod builder;
mod csr;

pub use adjacency::*;
pub use builder::*;
pub use csr::*;
