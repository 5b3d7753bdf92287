use allocator_api2::alloc::{ Allocator, Global };
use crate::tree::{
    callback::{ CompareLess, DropFree, TreeCompare },
    error::TreeError,
    iter::TreeIterator,
    rbtree::Tree
};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct MapPair<K, V> {
    key: K,
    value: V
}

impl<K, V> MapPair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
    pub fn get_key(&self) -> &K { &self.key }
    pub fn get_value(&self) -> &V { &self.value }
    pub fn get_value_mut(&mut self) -> &mut V { &mut self.value }
    pub fn into_inner(self) -> (K, V) { (self.key, self.value) }
}

/// Orders map pairs by key alone, using the wrapped key comparator.
pub struct KeyCompare<C>(C);

impl<K, V, C> TreeCompare<MapPair<K, V>> for KeyCompare<C>
where C: TreeCompare<K>
{
    fn compare(&self, d0: &MapPair<K, V>, d1: &MapPair<K, V>) -> Ordering {
        self.0.compare(&d0.key, &d1.key)
    }
}

/// Ordered key/value map on top of the red-black tree.
pub struct Map<K, V, C = CompareLess, A = Global>
where C: TreeCompare<K>,
      A: Allocator
{
    _impl: Tree<MapPair<K, V>, KeyCompare<C>, DropFree, A>
}

impl<K, V> Map<K, V, CompareLess, Global>
where K: Ord
{
    pub fn new() -> Self { Self::new_in(CompareLess, Global) }
}

impl<K, V> Default for Map<K, V, CompareLess, Global>
where K: Ord
{
    fn default() -> Self { Self::new() }
}

impl<K, V, C, A> Map<K, V, C, A>
where C: TreeCompare<K>,
      A: Allocator
{
    pub fn new_in(compare: C, alloc: A) -> Self {
        Self { _impl: Tree::new_in(KeyCompare(compare), DropFree, alloc) }
    }
    /// Fails if `key` is already present; the rejected pair comes back in the error.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError<MapPair<K, V>>> {
        self._impl.insert(MapPair::new(key, value))
    }
    pub fn len(&self) -> usize { self._impl.len() }
    pub fn is_empty(&self) -> bool { self._impl.is_empty() }

    pub fn get(&self, key: &K) -> Option<&V> {
        self._impl.get_by(|c, p| c.0.compare(&p.key, key)).map(|p| p.get_value())
    }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self._impl.get_by_mut(|c, p| c.0.compare(&p.key, key)).map(|p| p.get_value_mut())
    }
    pub fn contains_key(&self, key: &K) -> bool { self.get(key).is_some() }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self._impl.take_by(|c, p| c.0.compare(&p.key, key)).map(|p| p.value)
    }

    pub fn iter(&self) -> TreeIterator<'_, MapPair<K, V>> {
        self._impl.iter()
    }
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ { self.iter().map(|p| p.get_key()) }
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ { self.iter().map(|p| p.get_value()) }
}
