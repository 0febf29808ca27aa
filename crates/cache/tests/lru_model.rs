//! Model-based checks of capacity and eviction order

use flowgate_cache::{CacheConfig, TtlCache};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Set(u8, u32),
    Get(u8),
    Delete(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        (0u8..12).prop_map(Op::Get),
        (0u8..12).prop_map(Op::Delete),
    ]
}

/// Reference LRU: most recently used at the back
#[derive(Default)]
struct Model {
    order: Vec<(u8, u32)>,
}

impl Model {
    fn touch(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        let entry = self.order.remove(pos);
        self.order.push(entry);
        Some(entry.1)
    }

    fn set(&mut self, key: u8, value: u32, capacity: usize) {
        if let Some(pos) = self.order.iter().position(|(k, _)| *k == key) {
            self.order.remove(pos);
        } else if self.order.len() >= capacity {
            self.order.remove(0);
        }
        self.order.push((key, value));
    }

    fn delete(&mut self, key: u8) -> bool {
        match self.order.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }
}

proptest! {
    #[test]
    fn cache_matches_reference_lru(capacity in 1usize..6, ops in prop::collection::vec(op(), 1..200)) {
        let cache: TtlCache<String> =
            TtlCache::new(CacheConfig::new(capacity, Duration::from_secs(3600))).unwrap();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    prop_assert!(cache.set(&k.to_string(), v.to_string(), None));
                    model.set(k, v, capacity);
                }
                Op::Get(k) => {
                    let expected = model.touch(k).map(|v| v.to_string());
                    prop_assert_eq!(cache.get(&k.to_string()), expected);
                }
                Op::Delete(k) => {
                    prop_assert_eq!(cache.delete(&k.to_string()), model.delete(k));
                }
            }
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.len(), model.order.len());
        }
    }
}
