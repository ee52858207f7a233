use crate::{Map, Vector};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum MapAction {
    Insert(u8, u16),
    Remove(u8),
    Get(u8),
}

#[derive(Clone, Debug)]
enum VectorAction {
    Push(u16),
    Pop,
    Set(usize, u16),
    Get(usize),
}

fn map_action() -> impl Strategy<Value = MapAction> {
    prop_oneof![
        (any::<u8>(), any::<u16>()).prop_map(|(key, value)| MapAction::Insert(key, value)),
        any::<u8>().prop_map(MapAction::Remove),
        any::<u8>().prop_map(MapAction::Get),
    ]
}

fn vector_action() -> impl Strategy<Value = VectorAction> {
    prop_oneof![
        any::<u16>().prop_map(VectorAction::Push),
        Just(VectorAction::Pop),
        (0..300usize, any::<u16>()).prop_map(|(index, value)| VectorAction::Set(index, value)),
        (0..300usize).prop_map(VectorAction::Get),
    ]
}

proptest! {
    #[test]
    fn map_matches_hash_map(actions in proptest::collection::vec(map_action(), 0..256)) {
        let mut map = Map::new();
        let mut model = HashMap::new();

        for action in actions {
            match action {
                MapAction::Insert(key, value) => {
                    map = map.insert(key, value);
                    model.insert(key, value);
                }
                MapAction::Remove(key) => {
                    map = map.remove(&key);
                    model.remove(&key);
                }
                MapAction::Get(key) => {
                    prop_assert_eq!(map.get(&key), model.get(&key));
                }
            }

            prop_assert_eq!(map.len(), model.len());
        }

        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }

    #[test]
    fn vector_matches_vec(actions in proptest::collection::vec(vector_action(), 0..256)) {
        let mut vector = Vector::new();
        let mut model = Vec::new();

        for action in actions {
            match action {
                VectorAction::Push(value) => {
                    vector = vector.push(value);
                    model.push(value);
                }
                VectorAction::Pop => match vector.pop() {
                    Some(shortened) => {
                        vector = shortened;
                        model.pop();
                    }
                    None => prop_assert!(model.is_empty()),
                },
                VectorAction::Set(index, value) => match vector.set(index, value) {
                    Some(updated) => {
                        vector = updated;
                        model[index] = value;
                    }
                    None => prop_assert!(index >= model.len()),
                },
                VectorAction::Get(index) => {
                    prop_assert_eq!(vector.get(index), model.get(index));
                }
            }

            prop_assert_eq!(vector.len(), model.len());
        }

        prop_assert_eq!(vector.iter().copied().collect::<Vec<_>>(), model);
    }

    #[test]
    fn vector_push_preserves_original(values in proptest::collection::vec(any::<u16>(), 0..100)) {
        let vector = values.iter().copied().collect::<Vector<_>>();
        let extended = vector.push(0);

        prop_assert_eq!(vector.len(), values.len());
        prop_assert_eq!(vector.iter().copied().collect::<Vec<_>>(), values);
        prop_assert_eq!(extended.len(), vector.len() + 1);
    }
}
