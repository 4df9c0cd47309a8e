/*!
# Generic Frontier Search

One search kernel parameterized by
- a [`Frontier`], whose add/take discipline decides the order in which discovered vertices are
  expanded (a `Vec` is a stack, a `VecDeque` a FIFO queue, a [`PriorityFrontier`] best-first),
- an explored [`Set`], whose `insert` is the test-and-mark step.

All sources are marked and reported first. Then the kernel repeatedly takes a vertex from the
frontier and, for each out-edge whose head is not yet explored, marks the head, reports the
tree edge and the head, and adds the head to the frontier. Every vertex is therefore reported at
most once. A frontier that refuses an element ends the search with
[`GraphError::FrontierRejected`].

```
use utraverse::prelude::*;
use std::collections::VecDeque;

let graph = CsrGraph::from_edges([(0, 1), (0, 2), (1, 3)]);
let explored = graph.vertex_bitset_unset();

let order: Vec<Node> = GenericSearch::new()
    .vertices(&graph, [0], explored, VecDeque::new())
    .collect::<Result<_, _>>()
    .unwrap();
assert_eq!(order, vec![0, 1, 2, 3]);
```
*/

use std::{collections::VecDeque, hash::Hash};

use fxhash::FxHashMap;

use super::*;
use crate::{GraphError, Result, heap::IndexedDaryHeap};

/// Ordered container of discovered but not yet expanded vertices.
pub trait Frontier<V> {
    /// Adds `v`; returns *false* if the frontier refuses it
    fn try_add(&mut self, v: V) -> bool;

    /// Removes and returns the next vertex to expand
    fn try_take(&mut self) -> Option<V>;

    /// Returns the number of queued vertices
    fn len(&self) -> usize;

    /// Returns *true* if no vertex is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stack discipline
impl<V> Frontier<V> for Vec<V> {
    fn try_add(&mut self, v: V) -> bool {
        self.push(v);
        true
    }

    fn try_take(&mut self) -> Option<V> {
        self.pop()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Queue discipline
impl<V> Frontier<V> for VecDeque<V> {
    fn try_add(&mut self, v: V) -> bool {
        self.push_back(v);
        true
    }

    fn try_take(&mut self) -> Option<V> {
        self.pop_front()
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}

impl<V, F> Frontier<V> for &mut F
where
    F: Frontier<V> + ?Sized,
{
    fn try_add(&mut self, v: V) -> bool {
        (**self).try_add(v)
    }

    fn try_take(&mut self) -> Option<V> {
        (**self).try_take()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Best-first frontier: takes the vertex with the smallest priority.
///
/// The priority of a vertex is computed once by `priority_of` when it is added and kept until
/// it is taken. Adding a vertex that is still queued recomputes its priority.
///
/// The heap array can be borrowed from a [`Pool`] via [`PriorityFrontier::from_buffer`] and handed
/// back with [`PriorityFrontier::into_buffer`].
pub struct PriorityFrontier<V, P, F> {
    heap: IndexedDaryHeap<V>,
    priorities: FxHashMap<V, P>,
    priority_of: F,
}

impl<V, P, F> PriorityFrontier<V, P, F>
where
    V: Copy + Eq + Hash,
    P: PartialOrd,
    F: FnMut(V) -> P,
{
    /// Creates an empty frontier ordered by `priority_of`
    pub fn new(priority_of: F) -> Self {
        Self::from_buffer(Vec::new(), priority_of)
    }

    /// Creates an empty frontier whose heap reuses the allocation of `buffer`
    pub fn from_buffer(buffer: Vec<V>, priority_of: F) -> Self {
        Self {
            heap: IndexedDaryHeap::from_buffer(buffer),
            priorities: FxHashMap::default(),
            priority_of,
        }
    }

    /// Drops all queued vertices and returns the heap array for reuse
    pub fn into_buffer(self) -> Vec<V> {
        self.heap.into_buffer()
    }

    /// Returns the priority `v` was queued with
    pub fn priority(&self, v: &V) -> Option<&P> {
        self.priorities.get(v)
    }
}

impl<V, P, F> Frontier<V> for PriorityFrontier<V, P, F>
where
    V: Copy + Eq + Hash,
    P: PartialOrd,
    F: FnMut(V) -> P,
{
    fn try_add(&mut self, v: V) -> bool {
        let priority = (self.priority_of)(v);
        self.priorities.insert(v, priority);
        self.heap.add_or_update(v, &self.priorities);
        true
    }

    fn try_take(&mut self) -> Option<V> {
        let v = self.heap.try_take(&self.priorities)?;
        self.priorities.remove(&v);
        Some(v)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Reports of the generic search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEvent<V, E> {
    /// Vertex was marked explored (sources included)
    Vertex(V),
    /// Edge through which a vertex was first reached
    TreeEdge(E),
}

/// Frontier-driven search; see the [module documentation](self).
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSearch<K = NeverCancel> {
    cancel: K,
}

impl GenericSearch {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> GenericSearch<K> {
    /// Polls `token` before every take from the frontier
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> GenericSearch<T> {
        GenericSearch { cancel: token }
    }
}

impl<K: Cancellation> GenericSearch<K> {
    /// Runs the search to completion, reporting every explored vertex to `on_vertex` and every
    /// tree edge to `on_tree_edge`.
    ///
    /// Returns an error if `frontier` refuses a vertex; the search stops right after reporting it.
    pub fn visit<G, S, X, F, OV, OT>(
        &self,
        graph: &G,
        sources: S,
        mut explored: X,
        mut frontier: F,
        mut on_vertex: OV,
        mut on_tree_edge: OT,
    ) -> Result<Outcome>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        X: Set<G::Vertex>,
        F: Frontier<G::Vertex>,
        OV: FnMut(G::Vertex),
        OT: FnMut(G::Edge),
    {
        for s in sources {
            if explored.insert(s) {
                continue;
            }

            on_vertex(s);
            if !frontier.try_add(s) {
                return Err(log_rejection());
            }
        }

        loop {
            if self.cancel.is_cancelled() {
                return Ok(log_cancellation("generic search"));
            }

            let Some(u) = frontier.try_take() else {
                return Ok(Outcome::Completed);
            };

            for e in graph.out_edges_of(u) {
                let Some(v) = graph.try_head(e) else {
                    continue;
                };

                if explored.insert(v) {
                    continue;
                }

                on_tree_edge(e);
                on_vertex(v);
                if !frontier.try_add(v) {
                    return Err(log_rejection());
                }
            }
        }
    }
}

impl<K: Cancellation> GenericSearch<K> {
    /// Runs [`GenericSearch::visit`] on an index-dense graph with an explored bitset rented from
    /// `bitsets`. The bitset is returned to the pool on every exit path.
    pub fn visit_pooled<G, S, F, OV, OT>(
        &self,
        graph: &G,
        sources: S,
        bitsets: &Pool<NodeBitSet>,
        frontier: F,
        on_vertex: OV,
        on_tree_edge: OT,
    ) -> Result<Outcome>
    where
        G: IncidenceGraph + GraphNodeOrder,
        S: IntoIterator<Item = Node>,
        F: Frontier<Node>,
        OV: FnMut(Node),
        OT: FnMut(G::Edge),
    {
        let mut explored = bitsets.rent_bitset(graph.number_of_nodes());
        self.visit(
            graph,
            sources,
            &mut *explored,
            frontier,
            on_vertex,
            on_tree_edge,
        )
    }
}

impl<K: Cancellation + Clone> GenericSearch<K> {
    /// Returns a lazy search yielding one [`SearchEvent`] per step
    pub fn steps<'a, G, S, X, F>(
        &self,
        graph: &'a G,
        sources: S,
        explored: X,
        frontier: F,
    ) -> SearchSteps<'a, G, S::IntoIter, X, F, K>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        X: Set<G::Vertex>,
        F: Frontier<G::Vertex>,
    {
        SearchSteps {
            graph,
            sources: Some(sources.into_iter()),
            explored,
            frontier,
            cancel: self.cancel.clone(),
            expanding: None,
            pending: VecDeque::new(),
            cancelled: false,
            done: false,
        }
    }

    /// Explored vertices in discovery order
    pub fn vertices<'a, G, S, X, F>(
        &self,
        graph: &'a G,
        sources: S,
        explored: X,
        frontier: F,
    ) -> impl Iterator<Item = Result<G::Vertex>> + use<'a, G, S, X, F, K>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        X: Set<G::Vertex>,
        F: Frontier<G::Vertex>,
    {
        self.steps(graph, sources, explored, frontier)
            .filter_map(|step| match step {
                Ok(SearchEvent::Vertex(v)) => Some(Ok(v)),
                Ok(SearchEvent::TreeEdge(_)) => None,
                Err(err) => Some(Err(err)),
            })
    }

    /// Edges of the search forest in discovery order
    pub fn tree_edges<'a, G, S, X, F>(
        &self,
        graph: &'a G,
        sources: S,
        explored: X,
        frontier: F,
    ) -> impl Iterator<Item = Result<G::Edge>> + use<'a, G, S, X, F, K>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        X: Set<G::Vertex>,
        F: Frontier<G::Vertex>,
    {
        self.steps(graph, sources, explored, frontier)
            .filter_map(|step| match step {
                Ok(SearchEvent::TreeEdge(e)) => Some(Ok(e)),
                Ok(SearchEvent::Vertex(_)) => None,
                Err(err) => Some(Err(err)),
            })
    }
}

fn log_rejection() -> GraphError {
    tracing::debug!("frontier rejected a discovered vertex");
    GraphError::FrontierRejected
}

/// Lazy generic search.
///
/// Each pull that finds no buffered report either seeds the sources, discovers at most one
/// vertex from the out-edges of the vertex being expanded, or takes the next vertex from the
/// frontier. After an error has been yielded the iterator is exhausted.
pub struct SearchSteps<'a, G, S, X, F, K>
where
    G: IncidenceGraph + 'a,
{
    graph: &'a G,
    sources: Option<S>,
    explored: X,
    frontier: F,
    cancel: K,
    expanding: Option<G::OutEdgeIter<'a>>,
    pending: VecDeque<Result<SearchEvent<G::Vertex, G::Edge>>>,
    cancelled: bool,
    done: bool,
}

impl<'a, G, S, X, F, K> SearchSteps<'a, G, S, X, F, K>
where
    G: IncidenceGraph + 'a,
    S: Iterator<Item = G::Vertex>,
    X: Set<G::Vertex>,
    F: Frontier<G::Vertex>,
    K: Cancellation,
{
    /// Returns *true* if the cancellation token stopped the search
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns the explored set in its current state
    pub fn explored(&self) -> &X {
        &self.explored
    }

    fn discover(&mut self, v: G::Vertex) {
        self.pending.push_back(Ok(SearchEvent::Vertex(v)));
        if !self.frontier.try_add(v) {
            self.pending.push_back(Err(log_rejection()));
            self.done = true;
        }
    }

    fn advance(&mut self) {
        let graph = self.graph;

        if let Some(sources) = self.sources.take() {
            for s in sources {
                if self.explored.insert(s) {
                    continue;
                }
                self.discover(s);
                if self.done {
                    return;
                }
            }
            return;
        }

        if let Some(edges) = self.expanding.as_mut() {
            let explored = &mut self.explored;
            let unexplored = edges.find_map(|e| {
                let v = graph.try_head(e)?;
                (!explored.insert(v)).then_some((e, v))
            });

            if let Some((e, v)) = unexplored {
                self.pending.push_back(Ok(SearchEvent::TreeEdge(e)));
                self.discover(v);
                return;
            }
            self.expanding = None;
        }

        if self.cancel.is_cancelled() {
            self.cancelled = true;
            self.done = true;
            log_cancellation("lazy generic search");
            return;
        }

        match self.frontier.try_take() {
            Some(u) => self.expanding = Some(graph.out_edges_of(u)),
            None => self.done = true,
        }
    }
}

impl<'a, G, S, X, F, K> Iterator for SearchSteps<'a, G, S, X, F, K>
where
    G: IncidenceGraph + 'a,
    S: Iterator<Item = G::Vertex>,
    X: Set<G::Vertex>,
    F: Frontier<G::Vertex>,
    K: Cancellation,
{
    type Item = Result<SearchEvent<G::Vertex, G::Edge>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                return Some(step);
            }

            if self.done {
                return None;
            }

            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_graph;
    use fxhash::FxHashSet;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;
    use std::cell::Cell;

    /// FIFO frontier that refuses elements beyond a fixed capacity
    struct BoundedQueue {
        queue: VecDeque<Node>,
        capacity: usize,
    }

    impl Frontier<Node> for BoundedQueue {
        fn try_add(&mut self, v: Node) -> bool {
            if self.queue.len() == self.capacity {
                return false;
            }
            self.queue.push_back(v);
            true
        }

        fn try_take(&mut self) -> Option<Node> {
            self.queue.pop_front()
        }

        fn len(&self) -> usize {
            self.queue.len()
        }
    }

    #[test]
    fn queue_frontier_matches_bfs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..30 {
            let n = rng.random_range(1..60);
            let m = rng.random_range(0..3 * n);
            let graph = random_graph(rng, n, m);
            let source = rng.random_range(0..n);

            let bfs = LazyBfs::new()
                .steps(&graph, source, Vec::<Color>::new())
                .discovered_vertices()
                .collect_vec();
            let search: Vec<Node> = GenericSearch::new()
                .vertices(&graph, [source], graph.vertex_bitset_unset(), VecDeque::new())
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(bfs, search);

            let bfs_tree = LazyBfs::new()
                .steps(&graph, source, Vec::<Color>::new())
                .tree_edges()
                .collect_vec();
            let search_tree: Vec<EdgeId> = GenericSearch::new()
                .tree_edges(&graph, [source], graph.vertex_bitset_unset(), VecDeque::new())
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(bfs_tree, search_tree);
        }
    }

    #[test]
    fn stack_frontier_reports_each_vertex_once() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);

        for _ in 0..30 {
            let n = rng.random_range(1..60);
            let m = rng.random_range(0..4 * n);
            let graph = random_graph(rng, n, m);
            let sources = (0..3).map(|_| rng.random_range(0..n)).collect_vec();

            let mut explored = graph.vertex_bitset_unset();
            let order: Vec<Node> = GenericSearch::new()
                .vertices(&graph, sources.iter().copied(), &mut explored, Vec::new())
                .collect::<Result<_>>()
                .unwrap();

            assert!(order.iter().all_unique());
            assert_eq!(order.len(), explored.cardinality() as usize);

            // same set as a BFS from the same sources
            let mut colors = vec![Color::None; n as usize];
            EagerBfs::new().traverse_all(&graph, sources.iter().copied(), &mut colors, ());
            for u in graph.vertices() {
                assert_eq!(explored.get_bit(u), colors[u as usize] == Color::Black);
            }
        }
    }

    #[test]
    fn eager_visit_agrees_with_lazy_steps() {
        let graph = CsrGraph::from_edges([(0, 1), (1, 2), (0, 2), (2, 3), (4, 0)]);

        let mut vertices = Vec::new();
        let mut tree = Vec::new();
        let outcome = GenericSearch::new().visit(
            &graph,
            [0, 4],
            FxHashSet::default(),
            Vec::new(),
            |u| vertices.push(u),
            |e| tree.push(e),
        );
        assert_eq!(outcome, Ok(Outcome::Completed));

        let mut lazy_vertices = Vec::new();
        let mut lazy_tree = Vec::new();
        for step in GenericSearch::new().steps(&graph, [0, 4], FxHashSet::default(), Vec::new()) {
            match step.unwrap() {
                SearchEvent::Vertex(u) => lazy_vertices.push(u),
                SearchEvent::TreeEdge(e) => lazy_tree.push(e),
            }
        }

        assert_eq!(vertices, lazy_vertices);
        assert_eq!(tree, lazy_tree);
        assert_eq!(vertices.len(), 5);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn rejected_vertex_fails_once() {
        let graph = CsrGraph::from_edges([(0, 1), (0, 2), (0, 3), (1, 4)]);
        let bounded = || BoundedQueue {
            queue: VecDeque::new(),
            capacity: 2,
        };

        let steps = GenericSearch::new()
            .vertices(&graph, [0], graph.vertex_bitset_unset(), bounded())
            .collect_vec();
        assert_eq!(
            steps,
            vec![
                Ok(0),
                Ok(1),
                Ok(2),
                Ok(3),
                Err(GraphError::FrontierRejected)
            ]
        );

        let mut reported = Vec::new();
        let result = GenericSearch::new().visit(
            &graph,
            [0],
            graph.vertex_bitset_unset(),
            bounded(),
            |u| reported.push(u),
            |_| {},
        );
        assert_eq!(result, Err(GraphError::FrontierRejected));
        assert_eq!(reported, vec![0, 1, 2, 3]);

        let sources = GenericSearch::new()
            .vertices(&graph, [0, 1, 2], graph.vertex_bitset_unset(), bounded())
            .collect_vec();
        assert_eq!(
            sources,
            vec![Ok(0), Ok(1), Ok(2), Err(GraphError::FrontierRejected)]
        );
    }

    #[test]
    fn priority_frontier_expands_best_first() {
        let graph = CsrGraph::from_edges([(0, 1), (0, 2), (1, 3), (2, 4)]);

        // larger ids first
        let frontier = PriorityFrontier::new(|u: Node| 10 - u);
        let order: Vec<Node> = GenericSearch::new()
            .vertices(&graph, [0], graph.vertex_bitset_unset(), frontier)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(order, vec![0, 1, 2, 4, 3]);

        let fifo: Vec<Node> = GenericSearch::new()
            .vertices(&graph, [0], graph.vertex_bitset_unset(), VecDeque::new())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(fifo, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn priority_frontier_takes_minimum() {
        let calls = Cell::new(0);
        let mut frontier = PriorityFrontier::new(|u: Node| {
            calls.set(calls.get() + 1);
            (u % 3, u)
        });

        for u in [5, 3, 7, 1, 6] {
            assert!(frontier.try_add(u));
        }
        assert_eq!(frontier.priority(&7), Some(&(1, 7)));
        assert_eq!(frontier.len(), 5);

        let taken = std::iter::from_fn(|| frontier.try_take()).collect_vec();
        assert_eq!(taken, vec![3, 6, 1, 7, 5]);
        assert!(frontier.is_empty());
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn node_set_records_discovery_order() {
        let rng = &mut Pcg64Mcg::seed_from_u64(29);
        let n = 50;
        let graph = random_graph(rng, n, 3 * n);
        let mut explored = NodeSet::new(n);

        for source in [0, 7, 13] {
            let order: Vec<Node> = GenericSearch::new()
                .vertices(&graph, [source], &mut explored, VecDeque::new())
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(explored.as_slice(), order.as_slice());
            explored.clear();
        }
    }

    #[test]
    fn pooled_visit_returns_bitset_on_every_exit() {
        let graph = CsrGraph::from_edges([(0, 1), (0, 2), (0, 3), (1, 4)]);
        let bitsets: Pool<NodeBitSet> = Pool::new();

        let mut reported = Vec::new();
        let completed = GenericSearch::new().visit_pooled(
            &graph,
            [0],
            &bitsets,
            VecDeque::new(),
            |u| reported.push(u),
            |_| {},
        );
        assert_eq!(completed, Ok(Outcome::Completed));
        assert_eq!(reported, vec![0, 1, 2, 3, 4]);
        assert_eq!(bitsets.retained(), 1);

        let rejected = GenericSearch::new().visit_pooled(
            &graph,
            [0],
            &bitsets,
            BoundedQueue {
                queue: VecDeque::new(),
                capacity: 2,
            },
            |_| {},
            |_| {},
        );
        assert_eq!(rejected, Err(GraphError::FrontierRejected));
        assert_eq!(bitsets.retained(), 1);

        let flag = Cell::new(false);
        let mut seen = Vec::new();
        let cancelled = GenericSearch::new().with_cancellation(&flag).visit_pooled(
            &graph,
            [0],
            &bitsets,
            Vec::new(),
            |u| {
                seen.push(u);
                flag.set(true);
            },
            |_| {},
        );
        assert_eq!(cancelled, Ok(Outcome::Cancelled));
        assert_eq!(seen, vec![0]);
        assert_eq!(bitsets.retained(), 1);

        // the recycled bitset starts empty
        let explored = bitsets.rent_bitset(graph.number_of_nodes());
        assert_eq!(explored.cardinality(), 0);
    }

    #[test]
    fn priority_frontier_reuses_buffer() {
        let buffer: Vec<Node> = Vec::with_capacity(16);
        let mut frontier = PriorityFrontier::from_buffer(buffer, |u: Node| u);
        for u in [4, 2, 8] {
            frontier.try_add(u);
        }
        assert_eq!(frontier.try_take(), Some(2));

        let buffer = frontier.into_buffer();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 16);
    }

    #[test]
    fn cancellation_is_checked_per_take() {
        let graph = CsrGraph::from_edges([(0, 1), (1, 2), (2, 3)]);
        let flag = Cell::new(false);

        let mut steps = GenericSearch::new().with_cancellation(&flag).steps(
            &graph,
            [0],
            graph.vertex_bitset_unset(),
            VecDeque::new(),
        );
        assert_eq!(steps.next(), Some(Ok(SearchEvent::Vertex(0))));
        assert_eq!(steps.next(), Some(Ok(SearchEvent::TreeEdge(0))));
        assert_eq!(steps.next(), Some(Ok(SearchEvent::Vertex(1))));
        flag.set(true);
        assert_eq!(steps.next(), None);
        assert!(steps.was_cancelled());
        assert_eq!(steps.explored().cardinality(), 2);

        let flag = Cell::new(false);
        let mut seen = Vec::new();
        let outcome = GenericSearch::new().with_cancellation(&flag).visit(
            &graph,
            [0],
            graph.vertex_bitset_unset(),
            Vec::new(),
            |u| {
                seen.push(u);
                if u == 2 {
                    flag.set(true);
                }
            },
            |_| {},
        );
        assert_eq!(outcome, Ok(Outcome::Cancelled));
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
