/*!
# Generalized Maps

Abstractions over map data structures. The d-ary heap uses them twice: for the external
priority map it reads lazily, and for its own element-to-slot index.

- Sparse or opaque keys -> `HashMap` / `FxHashMap`
- Dense indexed keys -> `[Option<T>]` / `Vec<Option<T>>`
*/

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use num::ToPrimitive;

/// Minimalist trait for map-like collections.
///
/// Supports insertion, removal, lookup, clearing, and size queries.
pub trait Map<K, V> {
    /// Inserts an `(key, value)` pair into the map.
    /// If the key was present before, returns the previous value, otherwise returns `None`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes a key from the map and returns the associated value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns a reference to the value corresponding to the given key, or `None` if the key is not present.
    fn get(&self, key: &K) -> Option<&V>;

    /// Clears all elements from the map.
    fn clear(&mut self);

    /// Returns the number of elements currently stored in the map.
    fn len(&self) -> usize;

    /// Returns `true` if the map is empty. Default implementation uses `len()`.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> Map<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// `[Option<T>]` usable as `Map` over dense keys.
///
/// # Panics
/// `insert` panics if the key is out of range; lookups and removals of such keys return `None`.
impl<I, T> Map<I, T> for [Option<T>]
where
    I: ToPrimitive,
{
    fn insert(&mut self, key: I, value: T) -> Option<T> {
        let key = key.to_usize().unwrap();
        self[key].replace(value)
    }

    fn remove(&mut self, key: &I) -> Option<T> {
        let key = key.to_usize()?;
        self.get_mut(key)?.take()
    }

    fn get(&self, key: &I) -> Option<&T> {
        let key = key.to_usize()?;
        <[Option<T>]>::get(self, key)?.as_ref()
    }

    fn clear(&mut self) {
        self.iter_mut().for_each(|x| *x = None);
    }

    fn len(&self) -> usize {
        self.iter().filter(|x| x.is_some()).count()
    }
}

/// `Vec<Option<T>>` usable as `Map`; grows on insertion of a key past its end.
impl<I, T> Map<I, T> for Vec<Option<T>>
where
    I: ToPrimitive,
{
    fn insert(&mut self, key: I, value: T) -> Option<T> {
        let key = key.to_usize().unwrap();
        if key >= self.len() {
            self.resize_with(key + 1, || None);
        }
        self[key].replace(value)
    }

    fn remove(&mut self, key: &I) -> Option<T> {
        Map::remove(self.as_mut_slice(), key)
    }

    fn get(&self, key: &I) -> Option<&T> {
        Map::get(self.as_slice(), key)
    }

    fn clear(&mut self) {
        Map::<I, T>::clear(self.as_mut_slice())
    }

    fn len(&self) -> usize {
        Map::<I, T>::len(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;

    fn exercise<M: Map<u32, &'static str>>(mut map: M) {
        assert!(map.is_empty());
        assert_eq!(map.insert(2, "b"), None);
        assert_eq!(map.insert(2, "c"), Some("b"));
        assert_eq!(map.insert(0, "a"), None);
        assert_eq!(map.get(&2), Some(&"c"));
        assert_eq!(map.get(&1), None);
        assert_eq!(map.get(&100), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove(&0), Some("a"));
        assert_eq!(map.remove(&100), None);
        assert_eq!(map.len(), 1);
        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn map_implementations_agree() {
        exercise(FxHashMap::<u32, &'static str>::default());
        exercise(HashMap::<u32, &'static str>::new());
        exercise(Vec::<Option<&'static str>>::new());
    }
}
