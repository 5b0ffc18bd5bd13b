use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Undo information for one open layer.
///
/// A key is tracked in at most one of the two collections: either it did not
/// exist when the layer was opened (`created`), or it did and its value at
/// that moment is kept in `overridden`.
#[derive(Debug, Clone)]
pub struct Layer<K, V> {
    created: HashSet<K>,
    overridden: HashMap<K, V>,
}

impl<K, V> Default for Layer<K, V> {
    fn default() -> Self {
        Self {
            created: HashSet::new(),
            overridden: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Layer<K, V> {
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn is_created<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.created.contains(key)
    }

    #[inline]
    pub fn is_backed_up<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.overridden.contains_key(key)
    }

    #[inline]
    pub fn mark_created(&mut self, key: K) {
        self.created.insert(key);
    }

    /// Forgets a key introduced in this layer. Returns whether it was one.
    #[inline]
    pub fn forget_created<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.created.remove(key)
    }

    /// Keeps `value` as the layer-open value of `key` unless one is kept already.
    pub fn back_up(&mut self, key: K, value: V) {
        self.overridden.entry(key).or_insert(value);
    }

    /// Number of keys this layer would touch on rollback.
    #[inline]
    pub fn len(&self) -> usize { self.created.len() + self.overridden.len() }

    pub(crate) fn into_parts(self) -> (HashSet<K>, HashMap<K, V>) {
        (self.created, self.overridden)
    }
}
