use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use crate::layered::LayeredMap;

/// An open layer tied to a scope.
///
/// Created by [`LayeredMap::scope`]. Everything written through the guard is
/// rolled back when it goes out of scope, whether the scope ends normally,
/// through `?` or by unwinding. Layers committed through the guard and left
/// open are rolled back along with it.
pub struct LayerGuard<'a, K: Eq + Hash + Clone, V> {
    map: &'a mut LayeredMap<K, V>,
    base: usize,
}

impl<'a, K: Eq + Hash + Clone, V> LayerGuard<'a, K, V> {
    pub(crate) fn new(map: &'a mut LayeredMap<K, V>) -> Self {
        let base = map.depth();
        map.commit();
        Self { map, base }
    }

    /// Rolls the layer back now and returns its changes.
    ///
    /// Layers committed through the guard and still open are rolled back
    /// first. Their changes are discarded, not merged into the result.
    pub fn finish(mut self) -> HashMap<K, V> {
        self.unwind()
    }

    fn unwind(&mut self) -> HashMap<K, V> {
        let mut changes = HashMap::new();
        while self.map.depth() > self.base {
            match self.map.reset() {
                Ok(layer) => changes = layer,
                Err(_) => break,
            }
        }
        changes
    }
}

impl<K: Eq + Hash + Clone, V> Deref for LayerGuard<'_, K, V> {
    type Target = LayeredMap<K, V>;
    fn deref(&self) -> &Self::Target { &*self.map }
}
impl<K: Eq + Hash + Clone, V> DerefMut for LayerGuard<'_, K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut *self.map }
}

impl<K: Eq + Hash + Clone, V> Drop for LayerGuard<'_, K, V> {
    fn drop(&mut self) {
        self.unwind();
    }
}
