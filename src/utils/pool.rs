/*!
# Scratch Pools

Traversals need transient per-call buffers (color maps, explored bitsets, frontiers, heap
arrays). A [`Pool`] hands such buffers out via [`Pool::rent_or_else`] and takes them back when
the returned [`Pooled`] guard is dropped. Since the return happens in `Drop`, a buffer comes back
on every exit path: normal completion, cancellation, `?`-propagated errors and unwinding panics.

The pool is passed explicitly into the traversal entry points that use it; there is no global
or thread-local cache. It is single-threaded (`!Sync`).

```
use utraverse::prelude::*;

let pool: Pool<Vec<Color>> = Pool::new();
{
    let mut colors = pool.rent_color_map(4);
    colors.set_color(2, Color::Gray);
}
assert_eq!(pool.retained(), 1);

// a returned buffer is handed out again, recycled
let colors = pool.rent_color_map(4);
assert_eq!(colors.color_of(2), Color::None);
```
*/

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    fmt,
    hash::{BuildHasher, Hash},
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use crate::{
    node::*,
    utils::color::{Color, ColorMap},
};

/// Buffers that can be reset to an empty state while keeping their allocation.
pub trait Recycle {
    /// Empties the buffer
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl<T> Recycle for VecDeque<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl<K, V, S: BuildHasher> Recycle for HashMap<K, V, S>
where
    K: Eq + Hash,
{
    fn recycle(&mut self) {
        self.clear();
    }
}

impl<T, S: BuildHasher> Recycle for HashSet<T, S>
where
    T: Eq + Hash,
{
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for NodeBitSet {
    fn recycle(&mut self) {
        self.clear_all();
    }
}

/// Pool of recyclable scratch buffers.
pub struct Pool<T: Recycle> {
    items: RefCell<Vec<T>>,
    max_retained: usize,
}

impl<T: Recycle> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recycle> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("retained", &self.retained())
            .field("max_retained", &self.max_retained)
            .finish()
    }
}

impl<T: Recycle> Pool<T> {
    /// Creates an empty pool without a bound on the number of retained buffers
    pub fn new() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            max_retained: usize::MAX,
        }
    }

    /// Bounds the number of buffers kept for reuse; excess returns are dropped
    pub fn with_max_retained(mut self, max_retained: usize) -> Self {
        self.max_retained = max_retained;
        self.items.get_mut().truncate(max_retained);
        self
    }

    /// Returns the number of buffers currently available for renting
    pub fn retained(&self) -> usize {
        self.items.borrow().len()
    }

    /// Rents a recycled buffer, or creates one with `make` if the pool is empty.
    /// The buffer returns to the pool when the guard is dropped.
    pub fn rent_or_else<F>(&self, make: F) -> Pooled<'_, T>
    where
        F: FnOnce() -> T,
    {
        let recycled = self.items.borrow_mut().pop();
        let item = recycled.unwrap_or_else(|| {
            tracing::trace!("scratch pool empty, allocating a new buffer");
            make()
        });

        Pooled {
            pool: self,
            item: ManuallyDrop::new(item),
        }
    }

    fn give_back(&self, mut item: T) {
        item.recycle();
        let mut items = self.items.borrow_mut();
        if items.len() < self.max_retained {
            items.push(item);
        }
    }
}

impl Pool<Vec<Color>> {
    /// Rents a dense color map with `n` entries, all [`Color::None`]
    pub fn rent_color_map(&self, n: NumNodes) -> Pooled<'_, Vec<Color>> {
        let mut colors = self.rent_or_else(|| Vec::with_capacity(n as usize));
        colors.resize(n as usize, Color::None);
        colors
    }
}

impl Pool<NodeBitSet> {
    /// Rents an empty bitset over `n` vertices
    pub fn rent_bitset(&self, n: NumNodes) -> Pooled<'_, NodeBitSet> {
        let mut bits = self.rent_or_else(|| NodeBitSet::new(n));
        if bits.number_of_bits() != n {
            *bits = NodeBitSet::new(n);
        }
        bits
    }
}

/// Scoped rental of a pooled buffer; returns the buffer to its pool when dropped.
pub struct Pooled<'a, T: Recycle> {
    pool: &'a Pool<T>,
    item: ManuallyDrop<T>,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        // `item` is never touched again after this
        let item = unsafe { ManuallyDrop::take(&mut self.item) };
        self.pool.give_back(item);
    }
}

impl<V, T> ColorMap<V> for Pooled<'_, T>
where
    T: ColorMap<V> + Recycle,
{
    #[inline]
    fn color_of(&self, v: V) -> Color {
        (**self).color_of(v)
    }

    #[inline]
    fn set_color(&mut self, v: V, color: Color) {
        (**self).set_color(v, color)
    }
}
