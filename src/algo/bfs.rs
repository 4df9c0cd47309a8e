/*!
# Breadth-First Search

A FIFO frontier of `Gray` vertices. When `u` is dequeued it is colored `Black` and finished
first; then each out-edge with a resolvable head is examined and classified by the head's color:

- undiscovered: [`BfsEvent::TreeEdge`], the head turns `Gray`, is discovered and enqueued
- `Gray` (still queued): [`BfsEvent::NonTreeGrayHeadEdge`]
- `Black` (already dequeued): [`BfsEvent::NonTreeBlackHeadEdge`]

All undiscovered sources are seeded before the first dequeue, so they share hop distance `0`
and vertices are discovered in non-decreasing hop distance from the source set.

[`EagerBfs`] drives a [`BfsHandler`]; [`LazyBfs`] yields the same events through [`BfsSteps`],
one dequeue per unit of work. The cancellation token is polled after each dequeue.

```
use utraverse::prelude::*;

let graph = CsrGraph::from_edges([(0, 1), (0, 2), (1, 3), (2, 3)]);
let order: Vec<_> = LazyBfs::new()
    .steps(&graph, 0, vec![Color::None; 4])
    .discovered_vertices()
    .collect();
assert_eq!(order, vec![0, 1, 2, 3]);
```
*/

use std::{collections::VecDeque, iter::Once};

use super::*;

/// A single occurrence during a breadth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BfsEvent<V, E> {
    /// A source is seeded
    StartVertex(V),
    /// Vertex turns `Gray` and is enqueued
    DiscoverVertex(V),
    /// Vertex is dequeued and turns `Black`
    FinishVertex(V),
    /// Edge is about to be classified
    ExamineEdge(E),
    /// Edge to an undiscovered head
    TreeEdge(E),
    /// Head is discovered but not yet dequeued
    NonTreeGrayHeadEdge(E),
    /// Head was already dequeued
    NonTreeBlackHeadEdge(E),
}

impl<V, E> BfsEvent<V, E> {
    /// Calls the method of `handler` matching this event
    pub fn dispatch<H>(self, handler: &mut H)
    where
        H: BfsHandler<V, E> + ?Sized,
    {
        match self {
            BfsEvent::StartVertex(u) => handler.start_vertex(u),
            BfsEvent::DiscoverVertex(u) => handler.discover_vertex(u),
            BfsEvent::FinishVertex(u) => handler.finish_vertex(u),
            BfsEvent::ExamineEdge(e) => handler.examine_edge(e),
            BfsEvent::TreeEdge(e) => handler.tree_edge(e),
            BfsEvent::NonTreeGrayHeadEdge(e) => handler.non_tree_gray_head_edge(e),
            BfsEvent::NonTreeBlackHeadEdge(e) => handler.non_tree_black_head_edge(e),
        }
    }
}

/// Callbacks of an eager breadth-first traversal; every method defaults to a no-op.
pub trait BfsHandler<V, E> {
    /// See [`BfsEvent::StartVertex`]
    fn start_vertex(&mut self, _u: V) {}
    /// See [`BfsEvent::DiscoverVertex`]
    fn discover_vertex(&mut self, _u: V) {}
    /// See [`BfsEvent::FinishVertex`]
    fn finish_vertex(&mut self, _u: V) {}
    /// See [`BfsEvent::ExamineEdge`]
    fn examine_edge(&mut self, _e: E) {}
    /// See [`BfsEvent::TreeEdge`]
    fn tree_edge(&mut self, _e: E) {}
    /// See [`BfsEvent::NonTreeGrayHeadEdge`]
    fn non_tree_gray_head_edge(&mut self, _e: E) {}
    /// See [`BfsEvent::NonTreeBlackHeadEdge`]
    fn non_tree_black_head_edge(&mut self, _e: E) {}
}

impl<V, E> BfsHandler<V, E> for () {}

impl<V, E> BfsHandler<V, E> for Vec<BfsEvent<V, E>> {
    fn start_vertex(&mut self, u: V) {
        self.push(BfsEvent::StartVertex(u));
    }

    fn discover_vertex(&mut self, u: V) {
        self.push(BfsEvent::DiscoverVertex(u));
    }

    fn finish_vertex(&mut self, u: V) {
        self.push(BfsEvent::FinishVertex(u));
    }

    fn examine_edge(&mut self, e: E) {
        self.push(BfsEvent::ExamineEdge(e));
    }

    fn tree_edge(&mut self, e: E) {
        self.push(BfsEvent::TreeEdge(e));
    }

    fn non_tree_gray_head_edge(&mut self, e: E) {
        self.push(BfsEvent::NonTreeGrayHeadEdge(e));
    }

    fn non_tree_black_head_edge(&mut self, e: E) {
        self.push(BfsEvent::NonTreeBlackHeadEdge(e));
    }
}

impl<V, E, H> BfsHandler<V, E> for &mut H
where
    H: BfsHandler<V, E> + ?Sized,
{
    fn start_vertex(&mut self, u: V) {
        (**self).start_vertex(u)
    }

    fn discover_vertex(&mut self, u: V) {
        (**self).discover_vertex(u)
    }

    fn finish_vertex(&mut self, u: V) {
        (**self).finish_vertex(u)
    }

    fn examine_edge(&mut self, e: E) {
        (**self).examine_edge(e)
    }

    fn tree_edge(&mut self, e: E) {
        (**self).tree_edge(e)
    }

    fn non_tree_gray_head_edge(&mut self, e: E) {
        (**self).non_tree_gray_head_edge(e)
    }

    fn non_tree_black_head_edge(&mut self, e: E) {
        (**self).non_tree_black_head_edge(e)
    }
}

/// Emits the events of seeding `sources` and enqueues every undiscovered one
fn seed<V, E, S, C>(
    sources: S,
    colors: &mut C,
    queue: &mut VecDeque<V>,
    emit: &mut impl FnMut(BfsEvent<V, E>),
) where
    V: Copy,
    S: IntoIterator<Item = V>,
    C: ColorMap<V>,
{
    for s in sources {
        if !colors.color_of(s).is_undiscovered() {
            continue;
        }

        emit(BfsEvent::StartVertex(s));
        colors.set_color(s, Color::Gray);
        emit(BfsEvent::DiscoverVertex(s));
        queue.push_back(s);
    }
}

/// Finishes `u` and, unless cancelled, examines its out-edges.
/// This is the unit of work shared by the eager and lazy forms.
fn expand<G, C, K>(
    graph: &G,
    u: G::Vertex,
    colors: &mut C,
    cancel: &K,
    queue: &mut VecDeque<G::Vertex>,
    emit: &mut impl FnMut(BfsEvent<G::Vertex, G::Edge>),
) -> Outcome
where
    G: IncidenceGraph,
    C: ColorMap<G::Vertex>,
    K: Cancellation,
{
    colors.set_color(u, Color::Black);
    emit(BfsEvent::FinishVertex(u));

    if cancel.is_cancelled() {
        return Outcome::Cancelled;
    }

    for e in graph.out_edges_of(u) {
        let Some(v) = graph.try_head(e) else {
            continue;
        };

        emit(BfsEvent::ExamineEdge(e));
        match colors.color_of(v) {
            Color::Gray => emit(BfsEvent::NonTreeGrayHeadEdge(e)),
            Color::Black => emit(BfsEvent::NonTreeBlackHeadEdge(e)),
            _ => {
                emit(BfsEvent::TreeEdge(e));
                colors.set_color(v, Color::Gray);
                emit(BfsEvent::DiscoverVertex(v));
                queue.push_back(v);
            }
        }
    }

    Outcome::Completed
}

/// BFS invoking a [`BfsHandler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerBfs<K = NeverCancel> {
    cancel: K,
}

impl EagerBfs {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> EagerBfs<K> {
    /// Polls `token` after every dequeue
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> EagerBfs<T> {
        EagerBfs { cancel: token }
    }
}

impl<K: Cancellation> EagerBfs<K> {
    /// Traverses every vertex reachable from `source`
    pub fn traverse<G, C, H>(&self, graph: &G, source: G::Vertex, colors: C, handler: H) -> Outcome
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
        H: BfsHandler<G::Vertex, G::Edge>,
    {
        self.traverse_all(graph, std::iter::once(source), colors, handler)
    }

    /// Traverses every vertex reachable from any of `sources`, all seeded at distance `0`
    pub fn traverse_all<G, S, C, H>(
        &self,
        graph: &G,
        sources: S,
        mut colors: C,
        mut handler: H,
    ) -> Outcome
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        C: ColorMap<G::Vertex>,
        H: BfsHandler<G::Vertex, G::Edge>,
    {
        let mut emit = |event: BfsEvent<G::Vertex, G::Edge>| event.dispatch(&mut handler);
        let mut queue = VecDeque::new();

        seed(sources, &mut colors, &mut queue, &mut emit);

        while let Some(u) = queue.pop_front() {
            if expand(graph, u, &mut colors, &self.cancel, &mut queue, &mut emit).is_cancelled() {
                return log_cancellation("eager bfs");
            }
        }

        Outcome::Completed
    }

    /// Traverses from `source` with a color map rented from `pool`
    pub fn traverse_pooled<G, H>(
        &self,
        graph: &G,
        source: Node,
        pool: &Pool<Vec<Color>>,
        handler: H,
    ) -> Outcome
    where
        G: IncidenceGraph + GraphNodeOrder,
        H: BfsHandler<Node, G::Edge>,
    {
        let mut colors = pool.rent_color_map(graph.number_of_nodes());
        self.traverse(graph, source, &mut *colors, handler)
    }
}

/// BFS driven by the caller; see [`BfsSteps`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyBfs<K = NeverCancel> {
    cancel: K,
}

impl LazyBfs {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> LazyBfs<K> {
    /// Polls `token` after every dequeue
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> LazyBfs<T> {
        LazyBfs { cancel: token }
    }
}

impl<K: Cancellation + Clone> LazyBfs<K> {
    /// Returns the events of a traversal from `source`
    pub fn steps<'a, G, C>(
        &self,
        graph: &'a G,
        source: G::Vertex,
        colors: C,
    ) -> BfsSteps<'a, G, Once<G::Vertex>, C, K>
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
    {
        self.steps_all(graph, std::iter::once(source), colors)
    }

    /// Returns the events of a traversal from all of `sources`
    pub fn steps_all<'a, G, S, C>(
        &self,
        graph: &'a G,
        sources: S,
        colors: C,
    ) -> BfsSteps<'a, G, S::IntoIter, C, K>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        C: ColorMap<G::Vertex>,
    {
        BfsSteps {
            graph,
            sources: Some(sources.into_iter()),
            colors,
            cancel: self.cancel.clone(),
            queue: VecDeque::new(),
            pending: VecDeque::new(),
            cancelled: false,
        }
    }
}

/// Lazy breadth-first traversal yielding [`BfsEvent`]s.
///
/// Sources are seeded on the first pull; afterwards every pull that finds no buffered event
/// dequeues exactly one vertex.
pub struct BfsSteps<'a, G, S, C, K>
where
    G: IncidenceGraph + 'a,
{
    graph: &'a G,
    sources: Option<S>,
    colors: C,
    cancel: K,
    queue: VecDeque<G::Vertex>,
    pending: VecDeque<BfsEvent<G::Vertex, G::Edge>>,
    cancelled: bool,
}

impl<'a, G, S, C, K> BfsSteps<'a, G, S, C, K>
where
    G: IncidenceGraph + 'a,
    S: Iterator<Item = G::Vertex>,
    C: ColorMap<G::Vertex>,
    K: Cancellation,
{
    /// Returns *true* if the cancellation token stopped the traversal
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns the color map in its current state
    pub fn colors(&self) -> &C {
        &self.colors
    }

    /// Vertices in discovery order
    pub fn discovered_vertices(self) -> impl Iterator<Item = G::Vertex> {
        self.filter_map(|event| match event {
            BfsEvent::DiscoverVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Vertices in dequeue order
    pub fn finished_vertices(self) -> impl Iterator<Item = G::Vertex> {
        self.filter_map(|event| match event {
            BfsEvent::FinishVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Edges of the BFS forest
    pub fn tree_edges(self) -> impl Iterator<Item = G::Edge> {
        self.filter_map(|event| match event {
            BfsEvent::TreeEdge(e) => Some(e),
            _ => None,
        })
    }
}

impl<'a, G, S, C, K> Iterator for BfsSteps<'a, G, S, C, K>
where
    G: IncidenceGraph + 'a,
    S: Iterator<Item = G::Vertex>,
    C: ColorMap<G::Vertex>,
    K: Cancellation,
{
    type Item = BfsEvent<G::Vertex, G::Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let pending = &mut self.pending;
            let mut emit = |event| pending.push_back(event);

            if let Some(sources) = self.sources.take() {
                seed(sources, &mut self.colors, &mut self.queue, &mut emit);
                continue;
            }

            let u = self.queue.pop_front()?;
            let outcome = expand(
                self.graph,
                u,
                &mut self.colors,
                &self.cancel,
                &mut self.queue,
                &mut emit,
            );

            if outcome.is_cancelled() {
                self.cancelled = true;
                self.queue.clear();
                log_cancellation("lazy bfs");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hop_distances, random_graph};
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;
    use std::cell::Cell;

    type Event = BfsEvent<Node, EdgeId>;

    fn eager_and_lazy(graph: &CsrGraph, sources: &[Node]) -> Vec<Event> {
        let mut eager: Vec<Event> = Vec::new();
        let outcome = EagerBfs::new().traverse_all(
            graph,
            sources.iter().copied(),
            vec![Color::None; graph.len()],
            &mut eager,
        );
        assert_eq!(outcome, Outcome::Completed);

        let lazy = LazyBfs::new()
            .steps_all(graph, sources.iter().copied(), Vec::<Color>::new())
            .collect_vec();
        assert_eq!(eager, lazy);
        eager
    }

    #[test]
    fn event_order() {
        use BfsEvent::*;
        let graph = CsrGraph::from_edges([(0, 1), (0, 2), (1, 2), (2, 0)]);

        assert_eq!(
            eager_and_lazy(&graph, &[0]),
            vec![
                StartVertex(0),
                DiscoverVertex(0),
                FinishVertex(0),
                ExamineEdge(0),
                TreeEdge(0),
                DiscoverVertex(1),
                ExamineEdge(1),
                TreeEdge(1),
                DiscoverVertex(2),
                FinishVertex(1),
                ExamineEdge(2),
                NonTreeGrayHeadEdge(2),
                FinishVertex(2),
                ExamineEdge(3),
                NonTreeBlackHeadEdge(3),
            ]
        );
    }

    #[test]
    fn discovery_follows_hop_distance() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for _ in 0..30 {
            let n = rng.random_range(1..50);
            let m = rng.random_range(0..3 * n);
            let graph = random_graph(rng, n, m);
            let source = rng.random_range(0..n);
            let dist = hop_distances(&graph, source);

            let mut colors = vec![Color::None; n as usize];
            let order = LazyBfs::new()
                .steps(&graph, source, &mut colors)
                .discovered_vertices()
                .collect_vec();

            let hops = order
                .iter()
                .map(|&u| dist[u as usize].unwrap())
                .collect_vec();
            assert!(hops.iter().tuple_windows().all(|(a, b)| a <= b));

            // exactly the reachable vertices are discovered, and all of them finished
            assert_eq!(order.len(), dist.iter().filter(|d| d.is_some()).count());
            for u in graph.vertices() {
                let expected = if dist[u as usize].is_some() {
                    Color::Black
                } else {
                    Color::None
                };
                assert_eq!(colors[u as usize], expected);
            }

            eager_and_lazy(&graph, &[source]);
        }
    }

    #[test]
    fn sources_are_seeded_together() {
        use BfsEvent::*;
        let graph = CsrGraph::from_edges([(0, 2), (1, 3), (3, 1)]);

        let events = eager_and_lazy(&graph, &[0, 1, 0]);
        assert_eq!(
            &events[..6],
            &[
                StartVertex(0),
                DiscoverVertex(0),
                StartVertex(1),
                DiscoverVertex(1),
                FinishVertex(0),
                ExamineEdge(0),
            ]
        );
        assert_eq!(
            events.iter().filter(|e| matches!(e, StartVertex(_))).count(),
            2
        );

        let tree = LazyBfs::new()
            .steps_all(&graph, [0, 1], Vec::<Color>::new())
            .tree_edges()
            .collect_vec();
        assert_eq!(tree, vec![0, 1]);
    }

    struct StopAfter<'c> {
        events: Vec<Event>,
        stop_after: Node,
        flag: &'c Cell<bool>,
    }

    impl BfsHandler<Node, EdgeId> for StopAfter<'_> {
        fn discover_vertex(&mut self, u: Node) {
            self.events.discover_vertex(u);
        }

        fn finish_vertex(&mut self, u: Node) {
            self.events.finish_vertex(u);
            if u == self.stop_after {
                self.flag.set(true);
            }
        }
    }

    #[test]
    fn cancellation_stops_after_the_dequeued_vertex() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("utraverse=debug")
            .with_test_writer()
            .try_init();

        use BfsEvent::*;
        let graph = CsrGraph::from_edges([(0, 1), (0, 2), (1, 3), (2, 4)]);

        let flag = Cell::new(false);
        let mut handler = StopAfter {
            events: Vec::new(),
            stop_after: 1,
            flag: &flag,
        };
        let mut colors = vec![Color::None; 5];
        let outcome = EagerBfs::new()
            .with_cancellation(&flag)
            .traverse(&graph, 0, &mut colors, &mut handler);

        assert!(outcome.is_cancelled());
        assert_eq!(
            handler.events,
            vec![
                DiscoverVertex(0),
                FinishVertex(0),
                DiscoverVertex(1),
                DiscoverVertex(2),
                FinishVertex(1),
            ]
        );
        assert_eq!(
            colors,
            vec![
                Color::Black,
                Color::Black,
                Color::Gray,
                Color::None,
                Color::None
            ]
        );

        let flag = Cell::new(false);
        let bfs = LazyBfs::new().with_cancellation(&flag);
        let mut steps = bfs.steps(&graph, 0, vec![Color::None; 5]);
        let mut finished = Vec::new();
        for event in steps.by_ref() {
            if let FinishVertex(u) = event {
                finished.push(u);
                if u == 1 {
                    flag.set(true);
                }
            }
        }
        // the flag is raised after the dequeue of 1 was already processed
        assert!(steps.was_cancelled());
        assert_eq!(finished, vec![0, 1, 2]);
        assert_eq!(steps.colors()[3], Color::Gray);
    }

    #[test]
    fn pooled_color_maps_are_returned() {
        let graph = CsrGraph::from_edges([(0, 1), (1, 2), (2, 0)]);
        let pool: Pool<Vec<Color>> = Pool::new();

        let mut events: Vec<Event> = Vec::new();
        EagerBfs::new().traverse_pooled(&graph, 1, &pool, &mut events);
        assert_eq!(pool.retained(), 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, BfsEvent::DiscoverVertex(_)))
                .count(),
            3
        );
    }

    #[test]
    fn opaque_vertices() {
        use fxhash::FxHashMap;
        let graph: AdjacencyMap<char> = [('s', 'a'), ('s', 'b'), ('a', 't'), ('b', 't')]
            .into_iter()
            .collect();

        let order = LazyBfs::new()
            .steps(&graph, 's', FxHashMap::<char, Color>::default())
            .discovered_vertices()
            .collect_vec();
        assert_eq!(order, vec!['s', 'a', 'b', 't']);
    }
}
