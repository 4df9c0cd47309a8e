/*!
# Depth-First Search

Three interchangeable strategies walk the same DFS forest and produce the same sequence of
[`DfsEvent`]s for the same graph, sources and initial colors:

- [`RecursiveDfs`] uses the call stack. Deep graphs can exhaust it, so it mostly serves as the
  reference the other two are checked against.
- [`EagerDfs`] keeps an explicit stack of `{vertex, remaining out-edges}` frames and invokes a
  [`DfsHandler`] synchronously.
- [`LazyDfs`] runs the same frame stack one step per pull and hands out events through the
  [`DfsSteps`] iterator.

### Semantics
Colors go from undiscovered (`None`/`White`) to `Gray` on discovery and to `Black` once every
out-edge was examined. Each examined edge is classified by the color of its head at that moment:

| head color     | event                               |
|----------------|-------------------------------------|
| `None`/`White` | [`DfsEvent::TreeEdge`], then descend |
| `Gray`         | [`DfsEvent::BackEdge`]               |
| `Black`        | [`DfsEvent::ForwardOrCrossEdge`]     |

Every examined edge receives [`DfsEvent::FinishEdge`] once it is done with; for tree edges this
happens right after the head has been finished. Edges whose head cannot be resolved are skipped
silently.

With several sources, each source that is still undiscovered when its turn comes starts a new
tree with [`DfsEvent::StartVertex`]; the others are skipped. A single-source traversal is a
multi-source traversal with one source.

The cancellation token is polled at the top of every loop iteration. Once it fires, the vertex
on top of the stack is colored `Black` and finished, and nothing else happens: vertices further
down the stack stay `Gray` without finish events.

```
use utraverse::prelude::*;

let graph = CsrGraph::from_edges([(0, 1), (1, 2), (2, 0)]);

let mut events: Vec<DfsEvent<Node, EdgeId>> = Vec::new();
EagerDfs::new().traverse(&graph, 0, vec![Color::None; 3], &mut events);
assert!(events.contains(&DfsEvent::BackEdge(2)));

let finished: Vec<_> = LazyDfs::new()
    .steps(&graph, 0, vec![Color::None; 3])
    .finished_vertices()
    .collect();
assert_eq!(finished, vec![2, 1, 0]);
```
*/

use std::{collections::VecDeque, iter::Once};

use super::*;

/// A single occurrence during a depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DfsEvent<V, E> {
    /// A source starts a new DFS tree
    StartVertex(V),
    /// Vertex turns `Gray`
    DiscoverVertex(V),
    /// Vertex turns `Black`
    FinishVertex(V),
    /// Edge is about to be classified
    ExamineEdge(E),
    /// Edge to an undiscovered head
    TreeEdge(E),
    /// Edge to a `Gray` head (an open ancestor, or the tail itself)
    BackEdge(E),
    /// Edge to a `Black` head
    ForwardOrCrossEdge(E),
    /// Edge is done with; for tree edges after the subtree of its head
    FinishEdge(E),
}

impl<V, E> DfsEvent<V, E> {
    /// Calls the method of `handler` matching this event
    pub fn dispatch<H>(self, handler: &mut H)
    where
        H: DfsHandler<V, E> + ?Sized,
    {
        match self {
            DfsEvent::StartVertex(u) => handler.start_vertex(u),
            DfsEvent::DiscoverVertex(u) => handler.discover_vertex(u),
            DfsEvent::FinishVertex(u) => handler.finish_vertex(u),
            DfsEvent::ExamineEdge(e) => handler.examine_edge(e),
            DfsEvent::TreeEdge(e) => handler.tree_edge(e),
            DfsEvent::BackEdge(e) => handler.back_edge(e),
            DfsEvent::ForwardOrCrossEdge(e) => handler.forward_or_cross_edge(e),
            DfsEvent::FinishEdge(e) => handler.finish_edge(e),
        }
    }
}

/// Callbacks of an eager depth-first traversal; every method defaults to a no-op.
///
/// `()` ignores all events, `Vec<DfsEvent<V, E>>` records them.
pub trait DfsHandler<V, E> {
    /// See [`DfsEvent::StartVertex`]
    fn start_vertex(&mut self, _u: V) {}
    /// See [`DfsEvent::DiscoverVertex`]
    fn discover_vertex(&mut self, _u: V) {}
    /// See [`DfsEvent::FinishVertex`]
    fn finish_vertex(&mut self, _u: V) {}
    /// See [`DfsEvent::ExamineEdge`]
    fn examine_edge(&mut self, _e: E) {}
    /// See [`DfsEvent::TreeEdge`]
    fn tree_edge(&mut self, _e: E) {}
    /// See [`DfsEvent::BackEdge`]
    fn back_edge(&mut self, _e: E) {}
    /// See [`DfsEvent::ForwardOrCrossEdge`]
    fn forward_or_cross_edge(&mut self, _e: E) {}
    /// See [`DfsEvent::FinishEdge`]
    fn finish_edge(&mut self, _e: E) {}
}

impl<V, E> DfsHandler<V, E> for () {}

impl<V, E> DfsHandler<V, E> for Vec<DfsEvent<V, E>> {
    fn start_vertex(&mut self, u: V) {
        self.push(DfsEvent::StartVertex(u));
    }

    fn discover_vertex(&mut self, u: V) {
        self.push(DfsEvent::DiscoverVertex(u));
    }

    fn finish_vertex(&mut self, u: V) {
        self.push(DfsEvent::FinishVertex(u));
    }

    fn examine_edge(&mut self, e: E) {
        self.push(DfsEvent::ExamineEdge(e));
    }

    fn tree_edge(&mut self, e: E) {
        self.push(DfsEvent::TreeEdge(e));
    }

    fn back_edge(&mut self, e: E) {
        self.push(DfsEvent::BackEdge(e));
    }

    fn forward_or_cross_edge(&mut self, e: E) {
        self.push(DfsEvent::ForwardOrCrossEdge(e));
    }

    fn finish_edge(&mut self, e: E) {
        self.push(DfsEvent::FinishEdge(e));
    }
}

impl<V, E, H> DfsHandler<V, E> for &mut H
where
    H: DfsHandler<V, E> + ?Sized,
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

    fn back_edge(&mut self, e: E) {
        (**self).back_edge(e)
    }

    fn forward_or_cross_edge(&mut self, e: E) {
        (**self).forward_or_cross_edge(e)
    }

    fn finish_edge(&mut self, e: E) {
        (**self).finish_edge(e)
    }
}

/// Open vertex on the explicit DFS stack
struct Frame<V, E, I> {
    vertex: V,
    /// tree edge through which `vertex` was discovered
    via: Option<E>,
    edges: I,
}

/// DFS on the call stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveDfs<K = NeverCancel> {
    cancel: K,
}

impl RecursiveDfs {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> RecursiveDfs<K> {
    /// Polls `token` during the traversal
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> RecursiveDfs<T> {
        RecursiveDfs { cancel: token }
    }
}

impl<K: Cancellation> RecursiveDfs<K> {
    /// Traverses the DFS tree rooted at `source`
    pub fn traverse<G, C, H>(&self, graph: &G, source: G::Vertex, colors: C, handler: H) -> Outcome
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
        H: DfsHandler<G::Vertex, G::Edge>,
    {
        self.traverse_all(graph, std::iter::once(source), colors, handler)
    }

    /// Traverses the DFS forest grown from `sources` in order
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
        H: DfsHandler<G::Vertex, G::Edge>,
    {
        for source in sources {
            if self.cancel.is_cancelled() {
                return log_cancellation("recursive dfs");
            }

            if !colors.color_of(source).is_undiscovered() {
                continue;
            }

            handler.start_vertex(source);
            if self.visit(graph, source, &mut colors, &mut handler).is_cancelled() {
                return log_cancellation("recursive dfs");
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
        H: DfsHandler<Node, G::Edge>,
    {
        let mut colors = pool.rent_color_map(graph.number_of_nodes());
        self.traverse(graph, source, &mut *colors, handler)
    }

    fn visit<G, C, H>(&self, graph: &G, u: G::Vertex, colors: &mut C, handler: &mut H) -> Outcome
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
        H: DfsHandler<G::Vertex, G::Edge>,
    {
        colors.set_color(u, Color::Gray);
        handler.discover_vertex(u);

        let mut edges = graph.out_edges_of(u);
        loop {
            if self.cancel.is_cancelled() {
                colors.set_color(u, Color::Black);
                handler.finish_vertex(u);
                return Outcome::Cancelled;
            }

            let Some(e) = edges.next() else {
                break;
            };
            let Some(v) = graph.try_head(e) else {
                continue;
            };

            handler.examine_edge(e);
            match colors.color_of(v) {
                Color::Gray => handler.back_edge(e),
                Color::Black => handler.forward_or_cross_edge(e),
                _ => {
                    handler.tree_edge(e);
                    if self.visit(graph, v, colors, handler).is_cancelled() {
                        return Outcome::Cancelled;
                    }
                }
            }
            handler.finish_edge(e);
        }

        colors.set_color(u, Color::Black);
        handler.finish_vertex(u);
        Outcome::Completed
    }
}

/// DFS on an explicit stack of frames, invoking a [`DfsHandler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerDfs<K = NeverCancel> {
    cancel: K,
}

impl EagerDfs {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> EagerDfs<K> {
    /// Polls `token` during the traversal
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> EagerDfs<T> {
        EagerDfs { cancel: token }
    }
}

impl<K: Cancellation> EagerDfs<K> {
    /// Traverses the DFS tree rooted at `source`
    pub fn traverse<G, C, H>(&self, graph: &G, source: G::Vertex, colors: C, handler: H) -> Outcome
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
        H: DfsHandler<G::Vertex, G::Edge>,
    {
        self.traverse_all(graph, std::iter::once(source), colors, handler)
    }

    /// Traverses the DFS forest grown from `sources` in order
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
        H: DfsHandler<G::Vertex, G::Edge>,
    {
        let mut stack = Vec::new();

        for source in sources {
            if self.cancel.is_cancelled() {
                return log_cancellation("eager dfs");
            }

            if !colors.color_of(source).is_undiscovered() {
                continue;
            }

            handler.start_vertex(source);
            colors.set_color(source, Color::Gray);
            handler.discover_vertex(source);
            stack.push(Frame {
                vertex: source,
                via: None,
                edges: graph.out_edges_of(source),
            });

            while let Some(frame) = stack.last_mut() {
                let u = frame.vertex;
                if self.cancel.is_cancelled() {
                    colors.set_color(u, Color::Black);
                    handler.finish_vertex(u);
                    return log_cancellation("eager dfs");
                }

                let Some(e) = frame.edges.next() else {
                    let via = frame.via;
                    stack.pop();

                    colors.set_color(u, Color::Black);
                    handler.finish_vertex(u);
                    if let Some(e) = via {
                        handler.finish_edge(e);
                    }
                    continue;
                };

                let Some(v) = graph.try_head(e) else {
                    continue;
                };

                handler.examine_edge(e);
                match colors.color_of(v) {
                    Color::Gray => {
                        handler.back_edge(e);
                        handler.finish_edge(e);
                    }
                    Color::Black => {
                        handler.forward_or_cross_edge(e);
                        handler.finish_edge(e);
                    }
                    _ => {
                        handler.tree_edge(e);
                        colors.set_color(v, Color::Gray);
                        handler.discover_vertex(v);
                        stack.push(Frame {
                            vertex: v,
                            via: Some(e),
                            edges: graph.out_edges_of(v),
                        });
                    }
                }
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
        H: DfsHandler<Node, G::Edge>,
    {
        let mut colors = pool.rent_color_map(graph.number_of_nodes());
        self.traverse(graph, source, &mut *colors, handler)
    }
}

/// DFS driven by the caller, one step per pull; see [`DfsSteps`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyDfs<K = NeverCancel> {
    cancel: K,
}

impl LazyDfs {
    /// Creates a strategy that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K> LazyDfs<K> {
    /// Polls `token` during the traversal
    pub fn with_cancellation<T: Cancellation>(self, token: T) -> LazyDfs<T> {
        LazyDfs { cancel: token }
    }
}

impl<K: Cancellation + Clone> LazyDfs<K> {
    /// Returns the events of the DFS tree rooted at `source`
    pub fn steps<'a, G, C>(
        &self,
        graph: &'a G,
        source: G::Vertex,
        colors: C,
    ) -> DfsSteps<'a, G, Once<G::Vertex>, C, K>
    where
        G: IncidenceGraph,
        C: ColorMap<G::Vertex>,
    {
        self.steps_all(graph, std::iter::once(source), colors)
    }

    /// Returns the events of the DFS forest grown from `sources` in order
    pub fn steps_all<'a, G, S, C>(
        &self,
        graph: &'a G,
        sources: S,
        colors: C,
    ) -> DfsSteps<'a, G, S::IntoIter, C, K>
    where
        G: IncidenceGraph,
        S: IntoIterator<Item = G::Vertex>,
        C: ColorMap<G::Vertex>,
    {
        DfsSteps {
            graph,
            sources: sources.into_iter(),
            colors,
            cancel: self.cancel.clone(),
            stack: Vec::new(),
            pending: VecDeque::new(),
            cancelled: false,
            done: false,
        }
    }
}

/// Lazy depth-first traversal; yields [`DfsEvent`]s in traversal order.
///
/// Each call to `next` performs at most one unit of work (start a tree, examine one edge, or
/// finish one vertex) and buffers the events it produces. The iterator is single-pass.
pub struct DfsSteps<'a, G, S, C, K>
where
    G: IncidenceGraph + 'a,
{
    graph: &'a G,
    sources: S,
    colors: C,
    cancel: K,
    stack: Vec<Frame<G::Vertex, G::Edge, G::OutEdgeIter<'a>>>,
    pending: VecDeque<DfsEvent<G::Vertex, G::Edge>>,
    cancelled: bool,
    done: bool,
}

impl<'a, G, S, C, K> DfsSteps<'a, G, S, C, K>
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

    /// Vertices in discovery order (preorder)
    pub fn discovered_vertices(self) -> impl Iterator<Item = G::Vertex> {
        self.filter_map(|event| match event {
            DfsEvent::DiscoverVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Vertices in finish order (postorder)
    pub fn finished_vertices(self) -> impl Iterator<Item = G::Vertex> {
        self.filter_map(|event| match event {
            DfsEvent::FinishVertex(u) => Some(u),
            _ => None,
        })
    }

    /// Edges of the DFS forest in the order they are taken
    pub fn tree_edges(self) -> impl Iterator<Item = G::Edge> {
        self.filter_map(|event| match event {
            DfsEvent::TreeEdge(e) => Some(e),
            _ => None,
        })
    }

    fn stop(&mut self, cancelled: bool) {
        self.done = true;
        self.cancelled = cancelled;
        self.stack.clear();
        if cancelled {
            log_cancellation("lazy dfs");
        }
    }

    fn start_next_tree(&mut self) {
        let graph = self.graph;
        loop {
            let Some(source) = self.sources.next() else {
                self.stop(false);
                return;
            };

            if self.cancel.is_cancelled() {
                self.stop(true);
                return;
            }

            if self.colors.color_of(source).is_undiscovered() {
                self.colors.set_color(source, Color::Gray);
                self.pending.push_back(DfsEvent::StartVertex(source));
                self.pending.push_back(DfsEvent::DiscoverVertex(source));
                self.stack.push(Frame {
                    vertex: source,
                    via: None,
                    edges: graph.out_edges_of(source),
                });
                return;
            }
        }
    }

    fn advance(&mut self) {
        let graph = self.graph;
        let Some(frame) = self.stack.last_mut() else {
            self.start_next_tree();
            return;
        };

        let u = frame.vertex;
        if self.cancel.is_cancelled() {
            self.colors.set_color(u, Color::Black);
            self.pending.push_back(DfsEvent::FinishVertex(u));
            self.stop(true);
            return;
        }

        let Some(e) = frame.edges.next() else {
            let via = frame.via;
            self.stack.pop();

            self.colors.set_color(u, Color::Black);
            self.pending.push_back(DfsEvent::FinishVertex(u));
            if let Some(e) = via {
                self.pending.push_back(DfsEvent::FinishEdge(e));
            }
            return;
        };

        let Some(v) = graph.try_head(e) else {
            return;
        };

        self.pending.push_back(DfsEvent::ExamineEdge(e));
        match self.colors.color_of(v) {
            Color::Gray => {
                self.pending.push_back(DfsEvent::BackEdge(e));
                self.pending.push_back(DfsEvent::FinishEdge(e));
            }
            Color::Black => {
                self.pending.push_back(DfsEvent::ForwardOrCrossEdge(e));
                self.pending.push_back(DfsEvent::FinishEdge(e));
            }
            _ => {
                self.pending.push_back(DfsEvent::TreeEdge(e));
                self.colors.set_color(v, Color::Gray);
                self.pending.push_back(DfsEvent::DiscoverVertex(v));
                self.stack.push(Frame {
                    vertex: v,
                    via: Some(e),
                    edges: graph.out_edges_of(v),
                });
            }
        }
    }
}

impl<'a, G, S, C, K> Iterator for DfsSteps<'a, G, S, C, K>
where
    G: IncidenceGraph + 'a,
    S: Iterator<Item = G::Vertex>,
    C: ColorMap<G::Vertex>,
    K: Cancellation,
{
    type Item = DfsEvent<G::Vertex, G::Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            if self.done {
                return None;
            }

            self.advance();
        }
    }
}
