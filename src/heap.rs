/*!
# Indexed d-ary Heap

[`IndexedDaryHeap`] is a min-heap over elements whose priorities live **outside** the heap, in
any [`Map`] from element to priority. The heap never stores a copy of a priority: every
operation that reorders elements receives the priority map by reference and looks priorities
up lazily. Decrease-key is therefore two steps on the caller's side:

1. change the priority in the map,
2. call [`IndexedDaryHeap::update`] for that element.

An auxiliary element-to-slot index (by default an `FxHashMap`) gives `O(1)` membership tests
and lets `update` find the element without a scan. `add`, `try_take` and `update` are
`O(ARITY * log_ARITY(n))`.

Elements with equal priorities are ordered structurally: the first candidate that is not
greater wins. No further tie rule is guaranteed.

```
use fxhash::FxHashMap;
use utraverse::heap::IndexedDaryHeap;

let mut priorities: FxHashMap<char, u32> = [('a', 3), ('b', 1), ('c', 2)].into_iter().collect();
let mut heap: IndexedDaryHeap<char> = IndexedDaryHeap::new();
for e in ['a', 'b', 'c'] {
    heap.add(e, &priorities);
}

// decrease-key
priorities.insert('a', 0);
heap.update(&'a', &priorities);

assert_eq!(heap.try_take(&priorities), Some('a'));
assert_eq!(heap.try_take(&priorities), Some('b'));
assert!(heap.contains(&'c'));
```
*/

use std::fmt;

use fxhash::FxHashMap;

use crate::utils::{FromCapacity, Map};

/// Min-heap with external priorities and an element-to-slot index; see the
/// [module documentation](self).
///
/// - `E`: element type, usually a vertex
/// - `I`: index from element to its slot in the heap array
/// - `ARITY`: number of children per node (at least 2)
pub struct IndexedDaryHeap<E, I = FxHashMap<E, usize>, const ARITY: usize = 4> {
    elements: Vec<E>,
    slots: I,
}

impl<E, I, const ARITY: usize> fmt::Debug for IndexedDaryHeap<E, I, ARITY>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedDaryHeap")
            .field("arity", &ARITY)
            .field("elements", &self.elements)
            .finish()
    }
}

impl<E, I, const ARITY: usize> Default for IndexedDaryHeap<E, I, ARITY>
where
    I: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, I, const ARITY: usize> IndexedDaryHeap<E, I, ARITY> {
    const VALID_ARITY: () = assert!(ARITY >= 2, "a d-ary heap needs at least two children per node");

    /// Creates an empty heap
    pub fn new() -> Self
    where
        I: Default,
    {
        Self::from_buffer(Vec::new())
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self
    where
        I: FromCapacity,
    {
        let () = Self::VALID_ARITY;
        Self {
            elements: Vec::with_capacity(capacity),
            slots: I::from_capacity(capacity),
        }
    }

    /// Creates an empty heap that reuses the allocation of `buffer`, e.g. one rented from a
    /// [`Pool`](crate::utils::Pool). Any content of `buffer` is discarded.
    pub fn from_buffer(mut buffer: Vec<E>) -> Self
    where
        I: Default,
    {
        let () = Self::VALID_ARITY;
        buffer.clear();
        Self {
            elements: buffer,
            slots: I::default(),
        }
    }

    /// Empties the heap and returns its backing buffer for reuse
    pub fn into_buffer(mut self) -> Vec<E> {
        self.elements.clear();
        self.elements
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns *true* if the heap holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element with minimum priority without removing it
    #[inline]
    pub fn try_peek(&self) -> Option<&E> {
        self.elements.first()
    }
}

impl<E, I, const ARITY: usize> IndexedDaryHeap<E, I, ARITY>
where
    E: Clone,
    I: Map<E, usize>,
{
    /// Returns *true* if `e` was added and not taken yet
    #[inline]
    pub fn contains(&self, e: &E) -> bool {
        self.slots.get(e).is_some()
    }

    /// Removes all elements.
    /// Elements are only dropped individually if `E` has drop glue; otherwise this is `O(1)`
    /// for the heap array.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.slots.clear();
    }

    /// Adds `e` to the heap.
    ///
    /// # Panics
    /// Panics if `e` is already in the heap or has no entry in `priorities`; the heap is left
    /// unchanged in both cases.
    pub fn add<M, P>(&mut self, e: E, priorities: &M)
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        assert!(
            !self.contains(&e),
            "element is already in the heap, use `update` or `add_or_update`"
        );
        assert!(
            priorities.get(&e).is_some(),
            "no priority registered for added heap element"
        );

        let slot = self.elements.len();
        self.slots.insert(e.clone(), slot);
        self.elements.push(e);
        self.sift_up(slot, priorities);

        debug_assert!(self.is_valid(priorities));
    }

    /// Removes and returns the element with minimum priority, or `None` if the heap is empty.
    ///
    /// # Panics
    /// Panics if a remaining element has no entry in `priorities`.
    pub fn try_take<M, P>(&mut self, priorities: &M) -> Option<E>
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        if self.elements.is_empty() {
            return None;
        }

        let top = self.elements.swap_remove(0);
        self.slots.remove(&top);

        if let Some(first) = self.elements.first() {
            self.slots.insert(first.clone(), 0);
            self.sift_down(0, priorities);
        }

        debug_assert!(self.is_valid(priorities));
        Some(top)
    }

    /// Restores the heap order after the priority of `e` was changed in `priorities`.
    ///
    /// # Panics
    /// Panics if `e` is not in the heap or has no entry in `priorities`.
    pub fn update<M, P>(&mut self, e: &E, priorities: &M)
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        let Some(&slot) = self.slots.get(e) else {
            panic!("updated element is not in the heap");
        };

        let slot = self.sift_up(slot, priorities);
        self.sift_down(slot, priorities);

        debug_assert!(self.is_valid(priorities));
    }

    /// Adds `e` if it is not in the heap, otherwise restores its position.
    ///
    /// # Panics
    /// Panics if `e` has no entry in `priorities`.
    pub fn add_or_update<M, P>(&mut self, e: E, priorities: &M)
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        if self.contains(&e) {
            self.update(&e, priorities);
        } else {
            self.add(e, priorities);
        }
    }

    fn priority_at<'p, M, P>(&self, slot: usize, priorities: &'p M) -> &'p P
    where
        M: Map<E, P> + ?Sized,
    {
        match priorities.get(&self.elements[slot]) {
            Some(p) => p,
            None => panic!("no priority registered for heap element in slot {slot}"),
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        self.slots.insert(self.elements[a].clone(), a);
        self.slots.insert(self.elements[b].clone(), b);
    }

    /// Moves the element in `slot` towards the root; returns its final slot
    fn sift_up<M, P>(&mut self, mut slot: usize, priorities: &M) -> usize
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        while slot > 0 {
            let parent = (slot - 1) / ARITY;
            if self.priority_at(slot, priorities) < self.priority_at(parent, priorities) {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
        slot
    }

    /// Moves the element in `slot` towards the leaves
    fn sift_down<M, P>(&mut self, mut slot: usize, priorities: &M)
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        loop {
            let first_child = slot * ARITY + 1;
            if first_child >= self.elements.len() {
                break;
            }

            let last_child = (first_child + ARITY).min(self.elements.len());
            let mut best = first_child;
            for child in first_child + 1..last_child {
                if self.priority_at(child, priorities) < self.priority_at(best, priorities) {
                    best = child;
                }
            }

            if self.priority_at(best, priorities) < self.priority_at(slot, priorities) {
                self.swap(slot, best);
                slot = best;
            } else {
                break;
            }
        }
    }

    /// Heap order holds and the index agrees with the heap array
    fn is_valid<M, P>(&self, priorities: &M) -> bool
    where
        M: Map<E, P> + ?Sized,
        P: PartialOrd,
    {
        self.slots.len() == self.elements.len()
            && self
                .elements
                .iter()
                .enumerate()
                .all(|(slot, e)| self.slots.get(e) == Some(&slot))
            && (1..self.elements.len()).all(|slot| {
                let parent = (slot - 1) / ARITY;
                !(self.priority_at(slot, priorities) < self.priority_at(parent, priorities))
            })
    }
}
