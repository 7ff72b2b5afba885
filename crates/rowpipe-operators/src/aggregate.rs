//! Grouping, de-duplication and frequency counts.
//!
//! Groups keep first-seen key order and arrival order within each group.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rowpipe_core::{Record, Result, Scalar};

use crate::set::Set;
use crate::stream::Stream;

/// Insertion-ordered multimap used by grouping and by the join engine.
#[derive(Debug)]
pub(crate) struct Grouper<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K: Hash + Eq + Clone, V> Grouper<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&[V]> {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in first-seen order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn into_groups(self) -> Vec<(K, Vec<V>)> {
        self.groups
    }
}

impl<'a, T: 'a> Stream<'a, T> {
    /// Materialize into `(key, group)` pairs.
    pub fn group_by_fn<K>(self, mut key_fn: impl FnMut(&T) -> K) -> Result<Set<(K, Vec<T>)>>
    where
        K: Hash + Eq + Clone,
    {
        self.try_group_by_fn(move |row| Ok(key_fn(row)))
    }

    pub fn try_group_by_fn<K>(
        self,
        mut key_fn: impl FnMut(&T) -> Result<K>,
    ) -> Result<Set<(K, Vec<T>)>>
    where
        K: Hash + Eq + Clone,
    {
        let mut grouper = Grouper::new();
        for row in self {
            let row = row?;
            grouper.insert(key_fn(&row)?, row);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(groups = grouper.len(), "group_by");
        Ok(Set::from(grouper.into_groups()))
    }

    /// Lazily keep the first element seen for each key.
    ///
    /// The seen-key set lives as long as the pipeline.
    pub fn dedupe<K>(self, mut key_fn: impl FnMut(&T) -> K + 'a) -> Stream<'a, T>
    where
        K: Hash + Eq + 'a,
    {
        let mut seen = HashSet::new();
        self.filter(move |row| seen.insert(key_fn(row)))
    }
}

impl<'a, T: Record + 'a> Stream<'a, T> {
    /// Group records by the value of one attribute.
    pub fn group_by(self, name: &str) -> Result<Set<(Scalar, Vec<T>)>> {
        let name = name.to_string();
        self.try_group_by_fn(move |row| row.require(&name).cloned())
    }
}

impl<'a, T: Hash + Eq + Clone + 'a> Stream<'a, T> {
    /// Count occurrences of each distinct value, in first-seen order.
    pub fn count_frequency(self) -> Result<Set<(T, usize)>> {
        let mut index: HashMap<T, usize> = HashMap::new();
        let mut counts: Vec<(T, usize)> = Vec::new();
        for row in self {
            let row = row?;
            match index.get(&row) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(row.clone(), counts.len());
                    counts.push((row, 1));
                }
            }
        }
        Ok(Set::from(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowpipe_core::{Datum, Error};

    #[test]
    fn group_by_fn_keeps_first_seen_order() {
        let groups = Stream::new(vec!["hi", "hey", "yo", "sup", "a"])
            .group_by_fn(|w| w.len())
            .unwrap();
        assert_eq!(
            groups,
            vec![(2, vec!["hi", "yo"]), (3, vec!["hey", "sup"]), (1, vec!["a"])]
        );
    }

    #[test]
    fn dedupe_by_first_element() {
        let out = Stream::new(vec![vec![0, 1], vec![0, 2], vec![1, 1]])
            .dedupe(|r| r[0])
            .to_list()
            .unwrap();
        assert_eq!(out, vec![vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn dedupe_is_lazy() {
        let mut stream = Stream::new("aaaabcccddd".chars()).dedupe(|c| *c);
        assert_eq!(stream.pull(), Ok('a'));
        assert_eq!(stream.pull(), Ok('b'));
        assert_eq!(stream.to_list().unwrap(), vec!['c', 'd']);
    }

    #[test]
    fn count_frequency_counts_in_first_seen_order() {
        let counts = Stream::new(vec!["a", "a", "b", "c", "a"])
            .count_frequency()
            .unwrap();
        assert_eq!(counts, vec![("a", 3), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn group_by_attribute_reports_missing() {
        let rows = vec![
            Datum::from_pairs([("dept", "sales")]),
            Datum::from_pairs([("name", "jo")]),
        ];
        let err = Stream::new(rows).group_by("dept").unwrap_err();
        assert_eq!(err, Error::missing("dept"));
    }

    #[test]
    fn grouper_lookup() {
        let mut g = Grouper::new();
        g.insert("k", 1);
        g.insert("j", 2);
        g.insert("k", 3);
        assert_eq!(g.get(&"k"), Some(&[1, 3][..]));
        assert!(g.contains_key(&"j"));
        assert_eq!(g.keys().copied().collect::<Vec<_>>(), vec!["k", "j"]);
        assert_eq!(g.len(), 2);
    }
}
