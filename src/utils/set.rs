/*!
# Explored Sets

Abstractions over set data structures, so that a traversal can pick the representation of its
explored-set that fits the graph:

- Dense, index-dense graphs -> [`NodeBitSet`]
- Sparse or opaque vertices -> `HashSet` / `FxHashSet`
- Dense, but iterated or cleared often -> [`NodeSet`]

The single operation a traversal needs is [`Set::insert`], which tests and marks in one call.
*/

use std::{
    collections::HashSet,
    hash::{BuildHasher, Hash},
};

use num::ToPrimitive;
use stream_bitset::{PrimIndex, bitset::BitSetImpl};

use crate::node::*;

/// Minimalist trait for a set-like collection.
pub trait Set<T> {
    /// Inserts `value` into the set.
    /// Returns `true` if the element was already present.
    fn insert(&mut self, value: T) -> bool;

    /// Removes `value` from the set.
    /// Returns `true` if the element was present.
    fn remove(&mut self, value: &T) -> bool;

    /// Returns `true` if the set contains `value`.
    fn contains(&self, value: &T) -> bool;

    /// Clears all elements from the set.
    fn clear(&mut self);

    /// Returns the number of elements in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, S> Set<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, value: T) -> bool {
        !HashSet::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        HashSet::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }

    fn clear(&mut self) {
        HashSet::clear(self);
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

/// Out-of-range indices are never contained and cannot be inserted
/// (`insert` reports them as present so a traversal skips them).
impl<I> Set<I> for BitSetImpl<I>
where
    I: PrimIndex,
{
    fn insert(&mut self, value: I) -> bool {
        if value >= self.number_of_bits() {
            return true;
        }
        self.set_bit(value)
    }

    fn remove(&mut self, value: &I) -> bool {
        *value < self.number_of_bits() && self.clear_bit(*value)
    }

    fn contains(&self, value: &I) -> bool {
        *value < self.number_of_bits() && self.get_bit(*value)
    }

    fn clear(&mut self) {
        self.clear_all();
    }

    fn len(&self) -> usize {
        self.cardinality().to_usize().unwrap()
    }
}

impl<T, S> Set<T> for &mut S
where
    S: Set<T> + ?Sized,
{
    fn insert(&mut self, value: T) -> bool {
        (**self).insert(value)
    }

    fn remove(&mut self, value: &T) -> bool {
        (**self).remove(value)
    }

    fn contains(&self, value: &T) -> bool {
        (**self).contains(value)
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// A set of vertices (0..n) supporting fast insertion, removal, iteration and clearing
/// proportional to its size.
pub struct NodeSet {
    data: Vec<Node>,
    positions: Vec<Option<OptionalNode>>,
}

impl NodeSet {
    /// Creates an empty vertex-set of size `n`
    pub fn new(n: NumNodes) -> Self {
        Self {
            data: Vec::new(),
            positions: vec![None; n as usize],
        }
    }

    /// Returns the elements in insertion order (up to removals).
    /// As an explored set this is the discovery order of the traversal.
    pub fn as_slice(&self) -> &[Node] {
        &self.data
    }
}

impl Set<Node> for NodeSet {
    fn insert(&mut self, value: Node) -> bool {
        let index = value as usize;
        if index >= self.positions.len() || self.positions[index].is_some() {
            return true;
        }

        self.positions[index] = OptionalNode::new(self.data.len() as Node);
        self.data.push(value);

        false
    }

    fn remove(&mut self, value: &Node) -> bool {
        let index = *value as usize;
        let pos = match self.positions.get(index).copied().flatten() {
            Some(pos) => pos.get() as usize,
            None => return false,
        };

        self.data.swap_remove(pos);
        if pos < self.data.len() {
            self.positions[self.data[pos] as usize] = self.positions[index];
        }

        self.positions[index] = None;

        true
    }

    fn contains(&self, value: &Node) -> bool {
        self.positions
            .get(*value as usize)
            .is_some_and(|p| p.is_some())
    }

    fn clear(&mut self) {
        for &u in &self.data {
            self.positions[u as usize] = None;
        }
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
