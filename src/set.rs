use crate::hamt::ClonedHamtIterator;
use crate::map::{KeyIterator, Map};
use std::{borrow::Borrow, hash::Hash};

/// Set data structure of HAMT.
///
/// Note that every method does not modify the original set but creates a new
/// one if necessary.
#[derive(Clone, Debug)]
pub struct Set<T> {
    map: Map<T, ()>,
}

impl<T> Set<T> {
    /// Returns a size of a set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if a set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns values in a set.
    pub fn iter(&self) -> SetIterator<T> {
        self.into_iter()
    }
}

impl<T: Hash + Eq> Set<T> {
    /// Creates a new set.
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    /// Checks if a value is contained in a set.
    pub fn contains<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
    {
        self.map.contains_key(value)
    }
}

impl<T: Clone + Hash + Eq> Set<T> {
    /// Inserts a value into a set.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        Self {
            map: self.map.insert(value, ()),
        }
    }

    /// Removes a value from a set if any.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> Self
    where
        T: Borrow<Q>,
    {
        Self {
            map: self.map.remove(value),
        }
    }

    /// Extends a set with an iterator of values.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = T>) -> Self {
        let mut set = self.clone();

        for value in iterator {
            set = set.insert(value);
        }

        set
    }

    /// Removes the first value in a set and returns a new set containing the
    /// rest of values.
    #[must_use]
    pub fn first_rest(&self) -> Option<(&T, Self)> {
        let (value, _, map) = self.map.first_rest()?;

        Some((value, Self { map }))
    }

    /// Calculates a union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            map: self.map.merge(&other.map),
        }
    }

    /// Calculates an intersection of two sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .filter(|value| other.contains(*value))
            .cloned()
            .collect()
    }

    /// Calculates a difference of two sets.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter()
            .filter(|value| !other.contains(*value))
            .cloned()
            .collect()
    }
}

impl<T: Hash + Eq> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Hash + Eq> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        Self {
            map: iterator.into_iter().map(|value| (value, ())).collect(),
        }
    }
}

impl<T: Hash + Eq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Hash + Eq> Eq for Set<T> {}

#[derive(Debug)]
pub struct SetIterator<'a, T: 'a>(KeyIterator<'a, T, ()>);

impl<'a, T> Iterator for SetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type IntoIter = SetIterator<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        SetIterator(self.map.keys())
    }
}

#[derive(Debug)]
pub struct ClonedSetIterator<T>(ClonedHamtIterator<T, ()>);

impl<T: Clone> Iterator for ClonedSetIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(value, _)| value)
    }
}

impl<T: Clone> IntoIterator for Set<T> {
    type IntoIter = ClonedSetIterator<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        ClonedSetIterator(self.map.into_iter())
    }
}
