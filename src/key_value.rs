#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
    hash: u64,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
