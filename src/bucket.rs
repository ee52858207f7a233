use std::{borrow::Borrow, sync::Arc};

// Entries of two or more keys sharing a full hash. The router checks the
// hash; the bucket only scans keys.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    hash: u64,
    entries: Arc<[(K, V)]>,
}

impl<K, V> Bucket<K, V> {
    pub fn new(hash: u64, entries: Vec<(K, V)>) -> Self {
        Self {
            hash,
            entries: entries.into(),
        }
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.len() == 1
    }

    pub fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K: PartialEq, V> Bucket<K, V> {
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq,
    {
        self.find_index(key).map(|index| &self.entries[index].1)
    }

    fn find_index<Q: ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq,
    {
        for (index, (other_key, _)) in self.entries.iter().enumerate() {
            if key == other_key.borrow() {
                return Some(index);
            }
        }

        None
    }
}

impl<K: Clone + PartialEq, V: Clone> Bucket<K, V> {
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        let mut entries = self.entries.to_vec();

        match self.find_index(&key) {
            Some(index) => {
                entries[index] = (key, value);

                (Self::new(self.hash, entries), false)
            }
            None => {
                entries.push((key, value));

                (Self::new(self.hash, entries), true)
            }
        }
    }

    pub fn remove<Q: ?Sized>(&self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: PartialEq,
    {
        self.find_index(key).map(|index| {
            let mut entries = self.entries.to_vec();

            entries.remove(index);

            Self::new(self.hash, entries)
        })
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Bucket<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|entry| other.entries.contains(entry))
    }
}

impl<K: PartialEq, V: PartialEq> Eq for Bucket<K, V> {}
