use crate::{bitmap::Bitmap, bucket::Bucket, key_value::KeyValue};
use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

const ENTRY_COUNT: usize = 32;
const SHIFT_STEP: usize = 5;
const DIGIT_MASK: u64 = 0b11111;
// A bitmap node holding this many children turns into an array node on the
// next insertion; an array node shrinking to the demotion size turns back.
const PROMOTION_SIZE: usize = 16;
const DEMOTION_SIZE: usize = 8;

pub fn hash_key(key: &(impl Hash + ?Sized)) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn digit(hash: u64, shift: usize) -> u8 {
    ((hash >> shift) & DIGIT_MASK) as u8
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node<K, V> {
    Leaf(KeyValue<K, V>),
    Bitmap(Arc<BitmapNode<K, V>>),
    Array(Arc<ArrayNode<K, V>>),
    Collision(Bucket<K, V>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitmapNode<K, V> {
    bitmap: Bitmap,
    children: Vec<Node<K, V>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayNode<K, V> {
    size: usize,
    children: [Option<Node<K, V>>; ENTRY_COUNT],
}

impl<K, V> BitmapNode<K, V> {
    fn new() -> Self {
        Self {
            bitmap: Bitmap::new(),
            children: Vec::new(),
        }
    }

    fn singleton(index: u8, child: Node<K, V>) -> Self {
        Self {
            bitmap: Bitmap::new().set(index),
            children: vec![child],
        }
    }
}

impl<K: Clone, V: Clone> BitmapNode<K, V> {
    fn set_child(&self, position: usize, child: Node<K, V>) -> Self {
        let mut children = self.children.clone();

        children[position] = child;

        Self {
            bitmap: self.bitmap,
            children,
        }
    }

    fn insert_child(&self, index: u8, child: Node<K, V>) -> Self {
        let mut children = self.children.clone();

        children.insert(self.bitmap.index_of(index), child);

        Self {
            bitmap: self.bitmap.set(index),
            children,
        }
    }

    fn remove_child(&self, index: u8) -> Self {
        let mut children = self.children.clone();

        children.remove(self.bitmap.index_of(index));

        Self {
            bitmap: self.bitmap.unset(index),
            children,
        }
    }

    fn promote(&self, index: u8, child: Node<K, V>) -> ArrayNode<K, V> {
        let mut children: [Option<Node<K, V>>; ENTRY_COUNT] = Default::default();

        for digit in 0..ENTRY_COUNT as u8 {
            if self.bitmap.get(digit) {
                children[digit as usize] =
                    Some(self.children[self.bitmap.index_of(digit)].clone());
            }
        }

        children[index as usize] = Some(child);

        ArrayNode {
            size: self.children.len() + 1,
            children,
        }
    }
}

impl<K: Clone, V: Clone> ArrayNode<K, V> {
    fn set_child(&self, index: usize, child: Node<K, V>) -> Self {
        let mut children = self.children.clone();

        children[index] = Some(child);

        Self {
            size: self.size,
            children,
        }
    }

    fn fill_child(&self, index: usize, child: Node<K, V>) -> Self {
        let mut children = self.children.clone();

        children[index] = Some(child);

        Self {
            size: self.size + 1,
            children,
        }
    }

    fn clear_child(&self, index: usize) -> Self {
        let mut children = self.children.clone();

        children[index] = None;

        Self {
            size: self.size - 1,
            children,
        }
    }

    fn demote(&self, index: usize) -> BitmapNode<K, V> {
        let mut bitmap = Bitmap::new();
        let mut children = Vec::with_capacity(self.size - 1);

        for digit in 0..ENTRY_COUNT {
            if digit == index {
                continue;
            }

            if let Some(child) = &self.children[digit] {
                bitmap = bitmap.set(digit as u8);
                children.push(child.clone());
            }
        }

        BitmapNode { bitmap, children }
    }
}

impl<K, V> Node<K, V> {
    pub fn new() -> Self {
        Self::Bitmap(BitmapNode::new().into())
    }
}

impl<K: Hash + Eq, V> Node<K, V> {
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q, hash: u64, shift: usize) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::Leaf(key_value) => {
                if key_value.hash() == hash && key_value.key().borrow() == key {
                    Some(key_value.value())
                } else {
                    None
                }
            }
            Self::Bitmap(node) => {
                let index = digit(hash, shift);

                if node.bitmap.get(index) {
                    node.children[node.bitmap.index_of(index)].get(key, hash, shift + SHIFT_STEP)
                } else {
                    None
                }
            }
            Self::Array(node) => node.children[digit(hash, shift) as usize]
                .as_ref()
                .and_then(|child| child.get(key, hash, shift + SHIFT_STEP)),
            Self::Collision(bucket) => {
                if bucket.hash() == hash {
                    bucket.get(key)
                } else {
                    None
                }
            }
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Node<K, V> {
    pub fn insert(&self, key: K, value: V, hash: u64, shift: usize) -> (Self, bool) {
        match self {
            Self::Leaf(key_value) => {
                if key_value.hash() == hash && key_value.key() == &key {
                    (Self::Leaf(KeyValue::new(key, value, hash)), false)
                } else if key_value.hash() == hash {
                    (
                        Self::Collision(Bucket::new(
                            hash,
                            vec![
                                (key_value.key().clone(), key_value.value().clone()),
                                (key, value),
                            ],
                        )),
                        true,
                    )
                } else {
                    // Unequal hashes always diverge at some deeper digit, so
                    // reinsertion into a singleton bitmap node terminates.
                    let node = Self::Bitmap(
                        BitmapNode::singleton(digit(key_value.hash(), shift), self.clone()).into(),
                    );
                    let (node, _) = node.insert(key, value, hash, shift);

                    (node, true)
                }
            }
            Self::Bitmap(node) => {
                let index = digit(hash, shift);

                if node.bitmap.get(index) {
                    let position = node.bitmap.index_of(index);
                    let (child, new) =
                        node.children[position].insert(key, value, hash, shift + SHIFT_STEP);

                    (Self::Bitmap(node.set_child(position, child).into()), new)
                } else if node.bitmap.size() < PROMOTION_SIZE {
                    let leaf = Self::Leaf(KeyValue::new(key, value, hash));

                    (Self::Bitmap(node.insert_child(index, leaf).into()), true)
                } else {
                    let leaf = Self::Leaf(KeyValue::new(key, value, hash));

                    (Self::Array(node.promote(index, leaf).into()), true)
                }
            }
            Self::Array(node) => {
                let index = digit(hash, shift) as usize;

                match &node.children[index] {
                    Some(child) => {
                        let (child, new) = child.insert(key, value, hash, shift + SHIFT_STEP);

                        (Self::Array(node.set_child(index, child).into()), new)
                    }
                    None => {
                        let leaf = Self::Leaf(KeyValue::new(key, value, hash));

                        (Self::Array(node.fill_child(index, leaf).into()), true)
                    }
                }
            }
            Self::Collision(bucket) => {
                if bucket.hash() == hash {
                    let (bucket, new) = bucket.insert(key, value);

                    (Self::Collision(bucket), new)
                } else {
                    let node = Self::Bitmap(
                        BitmapNode::singleton(digit(bucket.hash(), shift), self.clone()).into(),
                    );
                    let (node, _) = node.insert(key, value, hash, shift);

                    (node, true)
                }
            }
        }
    }

    pub fn insert_mut(&mut self, key: K, value: V, hash: u64, shift: usize) -> bool {
        match self {
            Self::Leaf(key_value) => {
                if key_value.hash() == hash && key_value.key() == &key {
                    *self = Self::Leaf(KeyValue::new(key, value, hash));
                    false
                } else {
                    let (node, new) = self.insert(key, value, hash, shift);

                    *self = node;
                    new
                }
            }
            Self::Bitmap(node) => {
                let index = digit(hash, shift);

                if node.bitmap.get(index) {
                    let node = Arc::make_mut(node);
                    let position = node.bitmap.index_of(index);

                    node.children[position].insert_mut(key, value, hash, shift + SHIFT_STEP)
                } else if node.bitmap.size() < PROMOTION_SIZE {
                    let node = Arc::make_mut(node);

                    node.children.insert(
                        node.bitmap.index_of(index),
                        Self::Leaf(KeyValue::new(key, value, hash)),
                    );
                    node.bitmap = node.bitmap.set(index);
                    true
                } else {
                    let node = node.promote(index, Self::Leaf(KeyValue::new(key, value, hash)));

                    *self = Self::Array(node.into());
                    true
                }
            }
            Self::Array(node) => {
                let index = digit(hash, shift) as usize;
                let node = Arc::make_mut(node);

                match &mut node.children[index] {
                    Some(child) => child.insert_mut(key, value, hash, shift + SHIFT_STEP),
                    slot => {
                        *slot = Some(Self::Leaf(KeyValue::new(key, value, hash)));
                        node.size += 1;
                        true
                    }
                }
            }
            Self::Collision(bucket) => {
                if bucket.hash() == hash {
                    let (bucket, new) = bucket.insert(key, value);

                    *self = Self::Collision(bucket);
                    new
                } else {
                    let (node, new) = self.insert(key, value, hash, shift);

                    *self = node;
                    new
                }
            }
        }
    }

    // Outer None: the key is absent. Inner None: the node itself is gone.
    pub fn remove<Q: Hash + Eq + ?Sized>(
        &self,
        key: &Q,
        hash: u64,
        shift: usize,
    ) -> Option<Option<Self>>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::Leaf(key_value) => {
                if key_value.hash() == hash && key_value.key().borrow() == key {
                    Some(None)
                } else {
                    None
                }
            }
            Self::Bitmap(node) => {
                let index = digit(hash, shift);

                if !node.bitmap.get(index) {
                    return None;
                }

                let position = node.bitmap.index_of(index);

                match node.children[position].remove(key, hash, shift + SHIFT_STEP)? {
                    Some(child) => Some(Some(
                        Self::Bitmap(node.set_child(position, child).into()).normalize(),
                    )),
                    None => {
                        if node.bitmap.unset(index).is_empty() {
                            Some(None)
                        } else {
                            Some(Some(
                                Self::Bitmap(node.remove_child(index).into()).normalize(),
                            ))
                        }
                    }
                }
            }
            Self::Array(node) => {
                let index = digit(hash, shift) as usize;
                let child = node.children[index].as_ref()?;

                match child.remove(key, hash, shift + SHIFT_STEP)? {
                    Some(child) => Some(Some(Self::Array(node.set_child(index, child).into()))),
                    None => Some(Some(if node.size - 1 <= DEMOTION_SIZE {
                        Self::Bitmap(node.demote(index).into())
                    } else {
                        Self::Array(node.clear_child(index).into())
                    })),
                }
            }
            Self::Collision(bucket) => {
                if bucket.hash() != hash {
                    return None;
                }

                let bucket = bucket.remove(key)?;

                Some(Some(if bucket.is_singleton() {
                    let (key, value) = bucket.as_slice()[0].clone();

                    Self::Leaf(KeyValue::new(key, value, bucket.hash()))
                } else {
                    Self::Collision(bucket)
                }))
            }
        }
    }

    // A bitmap node left with a single leaf collapses into it so that chains
    // built by digit divergence do not outlive their second entry.
    fn normalize(self) -> Self {
        if let Self::Bitmap(node) = &self {
            if let [child @ Self::Leaf(_)] = node.children.as_slice() {
                return child.clone();
            }
        }

        self
    }
}

#[cfg(test)]
impl<K, V> Node<K, V> {
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Bitmap(node) => node.children.iter().map(Self::entry_count).sum(),
            Self::Array(node) => node.children.iter().flatten().map(Self::entry_count).sum(),
            Self::Collision(bucket) => bucket.len(),
        }
    }

    pub fn is_normal(&self) -> bool {
        match self {
            Self::Leaf(_) => true,
            Self::Bitmap(node) => {
                node.bitmap.size() == node.children.len()
                    && node.children.len() <= PROMOTION_SIZE
                    && node
                        .children
                        .iter()
                        .all(|child| !child.is_singleton_leaf() && child.is_normal())
            }
            Self::Array(node) => {
                node.size == node.children.iter().flatten().count()
                    && node.size > DEMOTION_SIZE
                    && node
                        .children
                        .iter()
                        .flatten()
                        .all(|child| !child.is_singleton_leaf() && child.is_normal())
            }
            Self::Collision(bucket) => bucket.len() >= 2,
        }
    }

    fn is_singleton_leaf(&self) -> bool {
        if let Self::Bitmap(node) = self {
            matches!(node.children.as_slice(), [Self::Leaf(_)])
        } else {
            false
        }
    }

    pub fn contains_collision(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Bitmap(node) => node.children.iter().any(Self::contains_collision),
            Self::Array(node) => node.children.iter().flatten().any(Self::contains_collision),
            Self::Collision(_) => true,
        }
    }
}

#[derive(Debug)]
pub struct HamtIterator<'a, K: 'a, V: 'a>(Vec<(&'a Node<K, V>, usize)>);

impl<'a, K, V> HamtIterator<'a, K, V> {
    pub fn new(root: &'a Node<K, V>) -> Self {
        Self(vec![(root, 0)])
    }
}

impl<'a, K, V> Iterator for HamtIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop().and_then(|(node, index)| match node {
            Node::Leaf(key_value) => Some((key_value.key(), key_value.value())),
            Node::Bitmap(bitmap_node) => {
                if index == bitmap_node.children.len() {
                    return self.next();
                }

                self.0.push((node, index + 1));
                self.0.push((&bitmap_node.children[index], 0));
                self.next()
            }
            Node::Array(array_node) => {
                if index == ENTRY_COUNT {
                    return self.next();
                }

                self.0.push((node, index + 1));

                if let Some(child) = &array_node.children[index] {
                    self.0.push((child, 0));
                }

                self.next()
            }
            Node::Collision(bucket) => {
                if index == bucket.len() {
                    return self.next();
                }

                self.0.push((node, index + 1));

                let (key, value) = &bucket.as_slice()[index];

                Some((key, value))
            }
        })
    }
}

#[derive(Debug)]
pub struct ClonedHamtIterator<K, V>(Vec<(Node<K, V>, usize)>);

impl<K, V> ClonedHamtIterator<K, V> {
    pub fn new(root: Node<K, V>) -> Self {
        Self(vec![(root, 0)])
    }
}

impl<K: Clone, V: Clone> Iterator for ClonedHamtIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop().and_then(|(node, index)| match node {
            Node::Leaf(key_value) => Some(key_value.into_pair()),
            Node::Bitmap(bitmap_node) => {
                if index == bitmap_node.children.len() {
                    return self.next();
                }

                let child = bitmap_node.children[index].clone();

                self.0.push((Node::Bitmap(bitmap_node), index + 1));
                self.0.push((child, 0));
                self.next()
            }
            Node::Array(array_node) => {
                if index == ENTRY_COUNT {
                    return self.next();
                }

                let child = array_node.children[index].clone();

                self.0.push((Node::Array(array_node), index + 1));

                if let Some(child) = child {
                    self.0.push((child, 0));
                }

                self.next()
            }
            Node::Collision(bucket) => {
                if index == bucket.len() {
                    return self.next();
                }

                let entry = bucket.as_slice()[index].clone();

                self.0.push((Node::Collision(bucket), index + 1));

                Some(entry)
            }
        })
    }
}
