use std::borrow::Borrow;
use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::ops::Index;
use crate::layered::{Layer, LayerGuard, MapError, MapResult};

/// A map whose changes can be grouped into layers and rolled back.
///
/// `active` always holds the visible state, so reads never look at the layer
/// stack. Each open layer only keeps what is needed to undo its own writes:
/// the keys it introduced and the values it replaced.
///
/// ```
/// use wardrobe::LayeredMap;
///
/// let mut map = LayeredMap::from_iter([("top", "bodysuit"), ("friend", "Lois")]);
///
/// map.commit().set("top", "shirt");
/// map.set("head", "glasses");
/// assert_eq!(map.get(&"top"), Ok(&"shirt"));
///
/// let changes = map.reset().unwrap();
/// assert_eq!(changes.len(), 2);
/// assert_eq!(map.get(&"top"), Ok(&"bodysuit"));
/// assert!(!map.has(&"head"));
/// ```
#[derive(Clone)]
pub struct LayeredMap<K, V> {
    active: HashMap<K, V>,
    // top layer is last
    layers: Vec<Layer<K, V>>,
}

impl<K, V> Default for LayeredMap<K, V> {
    fn default() -> Self {
        Self {
            active: HashMap::new(),
            layers: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> LayeredMap<K, V> {
    #[inline]
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            active: HashMap::with_capacity(capacity),
            layers: Vec::new(),
        }
    }

    /// Builds a map with every key of `keys` bound to a copy of `value`.
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I, value: V) -> Self
    where
        V: Clone,
    {
        keys.into_iter()
            .map(|key| (key, value.clone()))
            .collect()
    }

    /// Number of open layers.
    #[inline]
    pub fn depth(&self) -> usize { self.layers.len() }

    #[inline]
    pub fn len(&self) -> usize { self.active.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.active.is_empty() }

    pub fn get<Q>(&self, key: &Q) -> MapResult<&V, K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.active.get(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_owned()))
    }

    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.active.get(key)
    }

    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.active.get(key).unwrap_or(default)
    }

    #[inline]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.active.contains_key(key)
    }

    pub fn set(&mut self, key: K, value: V) {
        let Some(layer) = self.layers.last_mut() else {
            self.active.insert(key, value);
            return;
        };

        // Already tracked by this layer: its undo record must stay as it was
        // when the layer was opened.
        if layer.is_backed_up(&key) || layer.is_created(&key) {
            self.active.insert(key, value);
        }
        else if let Some(prev) = self.active.insert(key.clone(), value) {
            layer.back_up(key, prev);
        }
        else {
            layer.mark_created(key);
        }
    }

    pub fn delete<Q>(&mut self, key: &Q) -> MapResult<(), K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let (key, value) = self.active.remove_entry(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_owned()))?;

        if let Some(layer) = self.layers.last_mut() {
            if !layer.forget_created::<K>(&key) {
                layer.back_up(key, value);
            }
        }
        Ok(())
    }

    /// Sets every entry through [`LayeredMap::set`].
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Like [`LayeredMap::update`], for callers holding a dynamic list of
    /// sources. Nothing is written unless there is at most one.
    pub fn update_from_sources<I>(&mut self, sources: Vec<I>) -> MapResult<(), K>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        if sources.len() > 1 {
            return Err(MapError::TooManySources { got: sources.len() });
        }
        for source in sources {
            self.update(source);
        }
        Ok(())
    }

    /// Removes some visible entry and returns it.
    ///
    /// The value is only cloned when the open layer has to back it up.
    pub fn pop_entry(&mut self) -> Option<(K, V)>
    where
        V: Clone,
    {
        let key = self.active.keys().next()?.clone();
        let (key, value) = self.active.remove_entry(&key)?;

        if let Some(layer) = self.layers.last_mut() {
            if !layer.forget_created(&key) && !layer.is_backed_up(&key) {
                layer.back_up(key.clone(), value.clone());
            }
        }
        Some((key, value))
    }

    /// Returns the value of `key`, setting it to `default` first if absent.
    pub fn set_default(&mut self, key: K, default: V) -> &V {
        if !self.active.contains_key(&key) {
            self.set(key.clone(), default);
        }
        &self.active[&key]
    }

    pub fn clear(&mut self) {
        match self.layers.last_mut() {
            None => self.active.clear(),
            Some(layer) => {
                for (key, value) in self.active.drain() {
                    if !layer.forget_created(&key) {
                        layer.back_up(key, value);
                    }
                }
            }
        }
    }

    pub fn keys(&self) -> Vec<K> {
        self.active.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.active.values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.active.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.active.iter()
    }

    /// Opens a new layer.
    pub fn commit(&mut self) -> &mut Self {
        self.layers.push(Layer::new());
        log::trace!("opened layer {}", self.layers.len());
        self
    }

    /// Rolls back the top layer.
    ///
    /// Returns the keys the layer touched, with the values they had right
    /// before the rollback. Keys the layer deleted are not part of it.
    pub fn reset(&mut self) -> MapResult<HashMap<K, V>, K> {
        let depth = self.layers.len();
        let layer = self.layers.pop().ok_or(MapError::NoOpenLayer)?;

        let mut changes = HashMap::with_capacity(layer.len());
        let (created, overridden) = layer.into_parts();

        for key in created {
            if let Some(value) = self.active.remove(&key) {
                changes.insert(key, value);
            }
        }
        for (key, value) in overridden {
            if let Some((key, current)) = self.active.remove_entry(&key) {
                changes.insert(key, current);
            }
            self.active.insert(key, value);
        }

        log::trace!("rolled back layer {depth}, {} key(s) changed", changes.len());
        Ok(changes)
    }

    /// Opens a layer that is rolled back when the returned guard is dropped.
    #[inline]
    pub fn scope(&mut self) -> LayerGuard<'_, K, V> {
        LayerGuard::new(self)
    }

    /// Runs `f` inside a layer that is rolled back afterwards, even if `f` panics.
    pub fn with_layer<R, F: FnOnce(&mut Self) -> R>(&mut self, f: F) -> R {
        let mut guard = self.scope();
        f(&mut *guard)
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for LayeredMap<K, V> {
    fn eq(&self, other: &Self) -> bool { self.active == other.active }
}
impl<K: Eq + Hash, V: Eq> Eq for LayeredMap<K, V> {}

impl<K: Debug, V: Debug> Debug for LayeredMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredMap")
            .field("active", &self.active)
            .field("depth", &self.layers.len())
            .finish()
    }
}

impl<K, Q, V> Index<&Q> for LayeredMap<K, V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    type Output = V;
    fn index(&self, key: &Q) -> &V { &self.active[key] }
}

impl<K, V> From<HashMap<K, V>> for LayeredMap<K, V> {
    fn from(active: HashMap<K, V>) -> Self {
        Self { active, layers: Vec::new() }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for LayeredMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(HashMap::from_iter(iter))
    }
}

impl<K: Eq + Hash + Clone, V> Extend<(K, V)> for LayeredMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a LayeredMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.active.iter() }
}
