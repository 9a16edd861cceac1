//! Insertion-ordered grouping map.
//!
//! Every rollup in the engine groups records under a key and folds them
//! into an accumulator. A plain HashMap loses the order groups were
//! first seen in, and that order is observable: top-product ties break
//! by first appearance and the cohort table caps at the first twelve
//! cohorts encountered. GroupMap keeps groups in first-seen order and
//! leaves any further ordering to an explicit sort at emission.

use std::collections::HashMap;
use std::hash::Hash;

pub struct GroupMap<K, V> {
    index:  HashMap<K, usize>,
    groups: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V> GroupMap<K, V> {
    pub fn new() -> Self {
        Self {
            index:  HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Accumulator for `key`, inserting `init()` on first sight.
    pub fn entry_or_insert_with(&mut self, key: &K, init: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.index.insert(key.clone(), i);
                self.groups.push((key.clone(), init()));
                i
            }
        };
        &mut self.groups[i].1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the map, yielding groups in first-seen order.
    pub fn into_groups(self) -> Vec<(K, V)> {
        self.groups
    }
}

impl<K: Eq + Hash + Clone, V: Default> GroupMap<K, V> {
    /// Accumulator for `key`, defaulting on first sight.
    pub fn entry(&mut self, key: &K) -> &mut V {
        self.entry_or_insert_with(key, V::default)
    }
}

impl<K: Eq + Hash + Clone, V> Default for GroupMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_first_seen_order() {
        let mut map: GroupMap<&str, u32> = GroupMap::new();
        for key in ["b", "a", "c", "a", "b", "a"] {
            *map.entry(&key) += 1;
        }
        let groups = map.into_groups();
        assert_eq!(
            groups,
            vec![("b", 2), ("a", 3), ("c", 1)],
            "groups must appear in first-seen order with full counts"
        );
    }

    #[test]
    fn entry_or_insert_with_runs_init_once() {
        let mut map: GroupMap<u8, Vec<u8>> = GroupMap::new();
        map.entry_or_insert_with(&1, || vec![9]).push(1);
        map.entry_or_insert_with(&1, || vec![9]).push(2);
        assert_eq!(map.into_groups(), vec![(1, vec![9, 1, 2])]);
    }
}
