/*!
# Utilities

Building blocks the traversal engine is generic over:
- [`Color`] / [`ColorMap`]: per-vertex visitation state,
- [`Set`]: explored-sets with a single test-and-mark operation,
- [`Map`]: priority maps and the heap's element-to-slot index,
- [`Pool`]: explicitly passed scratch-buffer pool,
- [`SlicedBuffer`](self::sliced_buffer::SlicedBuffer): the storage behind [`CsrGraph`](crate::repr::CsrGraph).
*/

use fxhash::{FxBuildHasher, FxHashMap};

pub mod color;
pub mod map;
pub mod pool;
pub mod set;
pub mod sliced_buffer;

pub use color::{Color, ColorMap};
pub use map::Map;
pub use pool::{Pool, Pooled, Recycle};
pub use set::{NodeSet, Set};

/// Helper trait for datastructures that can be initialized with capacity.
/// Can be interpreted as reserved space or guaranteed used space.
///
/// Dense containers (`Vec<T>` used as a [`Map`]) need room for the largest key, hash-based ones
/// only for the number of keys actually stored.
pub trait FromCapacity: Sized {
    /// Create a new instance with a given capacity
    fn from_capacity(capacity: usize) -> Self {
        Self::from_total_used_capacity(capacity, capacity)
    }

    /// Creates a new instance from the total capacity (ie. the largest key) and the number of
    /// entries that will actually be used.
    fn from_total_used_capacity(total: usize, used: usize) -> Self;
}

impl<T> FromCapacity for Vec<T> {
    fn from_total_used_capacity(total: usize, _used: usize) -> Self {
        Self::with_capacity(total)
    }
}

impl<K, V> FromCapacity for FxHashMap<K, V> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity_and_hasher(used, FxBuildHasher::default())
    }
}
