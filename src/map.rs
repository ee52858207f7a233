use crate::hamt::{hash_key, ClonedHamtIterator, HamtIterator, Node};
use std::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
    hash::Hash,
    sync::Arc,
};

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary.
#[derive(Clone, Debug)]
pub struct Map<K, V> {
    size: usize,
    root: Arc<Node<K, V>>,
}

impl<K, V> Map<K, V> {
    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns bindings in a map.
    pub fn iter(&self) -> HamtIterator<K, V> {
        self.into_iter()
    }

    /// Returns keys in a map.
    pub fn keys(&self) -> KeyIterator<K, V> {
        KeyIterator(self.into_iter())
    }

    /// Returns values in a map.
    pub fn values(&self) -> ValueIterator<K, V> {
        ValueIterator(self.into_iter())
    }

    /// Calls a function with each binding in a map.
    pub fn for_each(&self, mut function: impl FnMut(&K, &V)) {
        for (key, value) in self {
            function(key, value);
        }
    }
}

impl<K: Hash + Eq, V> Map<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self {
            size: 0,
            root: Node::new().into(),
        }
    }

    /// Finds a value corresponding to a key.
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.root.get(key, hash_key(key), 0)
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Map<K, V> {
    /// Inserts a binding of a key to a value into a map, replacing a binding
    /// of an equal key if any.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = hash_key(&key);
        let (root, new) = self.root.insert(key, value, hash, 0);

        Self {
            size: self.size + (new as usize),
            root: root.into(),
        }
    }

    /// Removes a binding of a key from a map if any. Removal of an absent key
    /// returns a map sharing its root with the original one.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
    {
        match self.root.remove(key, hash_key(key), 0) {
            Some(root) => Self {
                size: self.size - 1,
                root: root.map(Into::into).unwrap_or_else(|| Node::new().into()),
            },
            None => self.clone(),
        }
    }

    /// Merges two maps. Values in the given map win on keys contained in
    /// both.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }

        let mut map = self.clone();

        for (key, value) in other {
            map = map.insert(key.clone(), value.clone());
        }

        map
    }

    /// Creates a map from parallel sequences of keys and values, stopping at
    /// whichever is exhausted first.
    pub fn from_pairs(
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        keys.into_iter().zip(values).collect()
    }

    /// Removes the first binding in a map and returns it together with a map
    /// containing the rest of bindings.
    #[must_use]
    pub fn first_rest(&self) -> Option<(&K, &V, Self)> {
        let (key, value) = self.into_iter().next()?;

        Some((key, value, self.remove(key)))
    }

    fn insert_mut(&mut self, key: K, value: V) {
        let hash = hash_key(&key);

        self.size += Arc::make_mut(&mut self.root).insert_mut(key, value, hash, 0) as usize;
    }
}

impl<K: Hash + Eq, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let mut map = Self::new();

        for (key, value) in iterator {
            map.insert_mut(key, value);
        }

        map
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .into_iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for Map<K, V> {}

impl<K: Display, V: Display> Display for Map<K, V> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(formatter, "()");
        }

        write!(formatter, "{{")?;

        for (index, (key, value)) in self.into_iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }

            write!(formatter, "{}: {}", key, value)?;
        }

        write!(formatter, "}}")
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type IntoIter = HamtIterator<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        HamtIterator::new(&self.root)
    }
}

impl<K: Clone, V: Clone> IntoIterator for Map<K, V> {
    type IntoIter = ClonedHamtIterator<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        ClonedHamtIterator::new(self.root.as_ref().clone())
    }
}

#[derive(Debug)]
pub struct KeyIterator<'a, K: 'a, V: 'a>(HamtIterator<'a, K, V>);

impl<'a, K, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }
}

#[derive(Debug)]
pub struct ValueIterator<'a, K: 'a, V: 'a>(HamtIterator<'a, K, V>);

impl<'a, K, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }
}
