/*!
Traversals as methods on index-dense graphs.

[`Traversal`] is implemented for every [`IncidenceGraph`] with [`GraphNodeOrder`] and wires the
engines of this module to a fresh dense color map (or explored bitset) sized to the graph.
Use the strategy structs directly to bring your own color map, pool, or cancellation token.
*/

use std::iter::Once;

use super::*;
use crate::Result;

/// Lazy DFS over an index-dense graph with its own color map
pub type Dfs<'a, G> = DfsSteps<'a, G, Once<Node>, Vec<Color>, NeverCancel>;

/// Lazy BFS over an index-dense graph with its own color map
pub type Bfs<'a, G> = BfsSteps<'a, G, Once<Node>, Vec<Color>, NeverCancel>;

/// Records finish order and whether a back edge was seen
#[derive(Default)]
struct FinishOrder {
    finished: Vec<Node>,
    cyclic: bool,
}

impl<E> DfsHandler<Node, E> for FinishOrder {
    fn finish_vertex(&mut self, u: Node) {
        self.finished.push(u);
    }

    fn back_edge(&mut self, _e: E) {
        self.cyclic = true;
    }
}

/// Provides traversal algorithms directly as methods on graphs.
pub trait Traversal: IncidenceGraph + GraphNodeOrder + Sized {
    /// Returns the DFS events of the tree rooted at `source`.
    ///
    /// # Examples
    /// ```
    /// use utraverse::prelude::*;
    ///
    /// let g = CsrGraph::from_edges([(0, 1), (0, 2)]);
    /// let order: Vec<_> = g.dfs(0).discovered_vertices().collect();
    /// assert_eq!(order, vec![0, 1, 2]);
    /// ```
    fn dfs(&self, source: Node) -> Dfs<'_, Self> {
        LazyDfs::new().steps(self, source, vec![Color::None; self.len()])
    }

    /// Returns the BFS events of a traversal from `source`.
    ///
    /// # Examples
    /// ```
    /// use utraverse::prelude::*;
    ///
    /// let g = CsrGraph::from_edges([(0, 1), (1, 2), (0, 3)]);
    /// let order: Vec<_> = g.bfs(0).discovered_vertices().collect();
    /// assert_eq!(order, vec![0, 1, 3, 2]);
    /// ```
    fn bfs(&self, source: Node) -> Bfs<'_, Self> {
        LazyBfs::new().steps(self, source, vec![Color::None; self.len()])
    }

    /// Runs an eager DFS from `source`, reporting to `handler`
    fn dfs_visit<H>(&self, source: Node, handler: H) -> Outcome
    where
        H: DfsHandler<Node, Self::Edge>,
    {
        EagerDfs::new().traverse(self, source, vec![Color::None; self.len()], handler)
    }

    /// Runs an eager BFS from `source`, reporting to `handler`
    fn bfs_visit<H>(&self, source: Node, handler: H) -> Outcome
    where
        H: BfsHandler<Node, Self::Edge>,
    {
        EagerBfs::new().traverse(self, source, vec![Color::None; self.len()], handler)
    }

    /// Returns the vertices reachable from `source`, always expanding the discovered vertex of
    /// smallest `priority_of` next.
    ///
    /// # Examples
    /// ```
    /// use utraverse::prelude::*;
    ///
    /// let g = CsrGraph::from_edges([(0, 1), (0, 2), (1, 3), (2, 4)]);
    /// let order: Vec<Node> = g
    ///     .best_first(0, |u| std::cmp::Reverse(u))
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(order, vec![0, 1, 2, 4, 3]);
    /// ```
    fn best_first<P, F>(&self, source: Node, priority_of: F) -> impl Iterator<Item = Result<Node>>
    where
        P: PartialOrd,
        F: FnMut(Node) -> P,
    {
        GenericSearch::new().vertices(
            self,
            [source],
            self.vertex_bitset_unset(),
            PriorityFrontier::new(priority_of),
        )
    }

    /// Eager [`Traversal::best_first`] that reports each reached vertex to `on_vertex`.
    ///
    /// The explored bitset is rented from `bitsets` and the heap array from `heaps`; both go back
    /// to their pools when the search ends.
    fn best_first_pooled<P, F, OV>(
        &self,
        source: Node,
        priority_of: F,
        bitsets: &Pool<NodeBitSet>,
        heaps: &Pool<Vec<Node>>,
        on_vertex: OV,
    ) -> Result<Outcome>
    where
        P: PartialOrd,
        F: FnMut(Node) -> P,
        OV: FnMut(Node),
    {
        let mut heap = heaps.rent_or_else(Vec::new);
        let mut frontier = PriorityFrontier::from_buffer(std::mem::take(&mut *heap), priority_of);
        let result = GenericSearch::new().visit_pooled(
            self,
            [source],
            bitsets,
            &mut frontier,
            on_vertex,
            |_| {},
        );
        *heap = frontier.into_buffer();
        result
    }

    /// Returns the vertices in topological order, or `None` if the graph has a cycle.
    ///
    /// Self-loops count as cycles.
    ///
    /// # Examples
    /// ```
    /// use utraverse::prelude::*;
    ///
    /// let g = CsrGraph::from_edges([(2, 0), (0, 1)]);
    /// assert_eq!(g.topological_order(), Some(vec![2, 0, 1]));
    ///
    /// let g = CsrGraph::from_edges([(0, 1), (1, 0)]);
    /// assert_eq!(g.topological_order(), None);
    /// ```
    fn topological_order(&self) -> Option<Vec<Node>> {
        let mut order = FinishOrder::default();
        EagerDfs::new().traverse_all(
            self,
            self.vertices(),
            vec![Color::None; self.len()],
            &mut order,
        );

        if order.cyclic {
            return None;
        }

        order.finished.reverse();
        Some(order.finished)
    }
}

impl<G> Traversal for G where G: IncidenceGraph + GraphNodeOrder + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_graph;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn lazy_and_eager_methods_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);

        for _ in 0..10 {
            let n = rng.random_range(1..40);
            let m = rng.random_range(0..3 * n);
            let graph = random_graph(rng, n, m);
            let source = rng.random_range(0..n);

            let mut dfs: Vec<DfsEvent<Node, EdgeId>> = Vec::new();
            assert_eq!(graph.dfs_visit(source, &mut dfs), Outcome::Completed);
            assert_eq!(graph.dfs(source).collect_vec(), dfs);

            let mut bfs: Vec<BfsEvent<Node, EdgeId>> = Vec::new();
            assert_eq!(graph.bfs_visit(source, &mut bfs), Outcome::Completed);
            assert_eq!(graph.bfs(source).collect_vec(), bfs);
        }
    }

    #[test]
    fn best_first_with_constant_priority_reaches_everything() {
        let graph = CsrGraph::from_edges([(0, 1), (1, 2), (2, 0), (3, 0)]);
        let reached = graph
            .best_first(0, |_| 0)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(reached.iter().copied().sorted().collect_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn pooled_best_first_matches_lazy_and_recycles() {
        let rng = &mut Pcg64Mcg::seed_from_u64(31);
        let bitsets: Pool<NodeBitSet> = Pool::new();
        let heaps: Pool<Vec<Node>> = Pool::new();

        for _ in 0..10 {
            let n = rng.random_range(1..40);
            let m = rng.random_range(0..3 * n);
            let graph = random_graph(rng, n, m);
            let source = rng.random_range(0..n);

            let lazy: Vec<Node> = graph
                .best_first(source, |u| u % 7)
                .collect::<Result<_>>()
                .unwrap();

            let mut eager = Vec::new();
            let outcome =
                graph.best_first_pooled(source, |u| u % 7, &bitsets, &heaps, |u| eager.push(u));
            assert_eq!(outcome, Ok(Outcome::Completed));
            assert_eq!(eager, lazy);

            assert_eq!(bitsets.retained(), 1);
            assert_eq!(heaps.retained(), 1);
        }

        let heap = heaps.rent_or_else(|| panic!("heap array was not returned"));
        assert!(heap.is_empty());
        assert!(heap.capacity() > 0);
    }

    #[test]
    fn topological_order_respects_edges() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);

        for _ in 0..20 {
            let n: NumNodes = rng.random_range(1..30);
            // orient every edge from the smaller to the larger id
            let mut builder = CsrGraphBuilder::new();
            builder.ensure_vertex_count(n);
            for _ in 0..2 * n {
                let u = rng.random_range(0..n);
                let v = rng.random_range(0..n);
                if u != v {
                    builder.add_edge(u.min(v), u.max(v));
                }
            }
            let graph = builder.build();

            let order = graph.topological_order().unwrap();
            assert_eq!(order.len(), n as usize);

            let mut rank = vec![0; n as usize];
            for (i, &u) in order.iter().enumerate() {
                rank[u as usize] = i;
            }
            assert!(graph.edges().all(|Edge(u, v)| rank[u as usize] < rank[v as usize]));
        }

        assert_eq!(CsrGraph::from_edges([(0, 0)]).topological_order(), None);
    }
}
