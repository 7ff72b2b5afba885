//! Materialized, re-iterable sequences.

use std::fmt;
use std::ops::{Index, Range};

use serde::{Deserialize, Serialize};

use rowpipe_core::hash::{hash_serde, Hash256};
use rowpipe_core::{Error, PipelineConfig, Result};

use crate::stream::Stream;

/// Sort direction for `Set::sort_by_order`. Descending is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// A fully realized sequence. Order matches emission order of its source and
/// never changes once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Set<T> {
    items: Vec<T>,
}

impl<T> Set<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Stream that consumes this set.
    pub fn into_stream<'a>(self) -> Stream<'a, T>
    where
        T: 'a,
    {
        Stream::new(self.items)
    }

    /// Stream over clones of the elements; the set stays available.
    pub fn to_stream(&self) -> Stream<'_, T>
    where
        T: Clone,
    {
        Stream::new(self.items.iter().cloned())
    }

    pub fn slice(&self, range: Range<usize>) -> Result<Set<T>>
    where
        T: Clone,
    {
        self.items
            .get(range.clone())
            .map(|items| Set::from(items.to_vec()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "slice {}..{} out of bounds for set of length {}",
                    range.start,
                    range.end,
                    self.len()
                ))
            })
    }

    /// The first `n` elements; `Exhausted` if the set is shorter.
    pub fn take_now(&self, n: usize) -> Result<Set<T>>
    where
        T: Clone,
    {
        if n > self.len() {
            return Err(Error::Exhausted);
        }
        Ok(Set::from(self.items[..n].to_vec()))
    }

    /// Sort by key, descending.
    pub fn sort_by<K: Ord>(self, key_fn: impl FnMut(&T) -> K) -> Set<T> {
        self.sort_by_order(key_fn, SortOrder::default())
    }

    /// Stable sort by key in the given direction; equal keys keep their order.
    pub fn sort_by_order<K: Ord>(self, mut key_fn: impl FnMut(&T) -> K, order: SortOrder) -> Set<T> {
        let mut keyed: Vec<(K, T)> = self.items.into_iter().map(|t| (key_fn(&t), t)).collect();
        match order {
            SortOrder::Ascending => keyed.sort_by(|(a, _), (b, _)| a.cmp(b)),
            SortOrder::Descending => keyed.sort_by(|(a, _), (b, _)| b.cmp(a)),
        }
        Set::from(keyed.into_iter().map(|(_, t)| t).collect::<Vec<_>>())
    }

    pub fn reverse(mut self) -> Set<T> {
        self.items.reverse();
        self
    }

    /// Transform the whole set at once.
    pub fn apply<U, I>(self, f: impl FnOnce(Set<T>) -> I) -> Set<U>
    where
        I: IntoIterator<Item = U>,
    {
        f(self).into_iter().collect()
    }

    /// Hand the whole set to `f` for a side effect and return it unchanged.
    pub fn call(self, f: impl FnOnce(&Set<T>)) -> Set<T> {
        f(&self);
        self
    }

    /// Content hash of the set, stable across runs.
    pub fn fingerprint(&self) -> Result<Hash256>
    where
        T: Serialize,
    {
        hash_serde(&self.items)
    }
}

impl<T: fmt::Display> Set<T> {
    /// Render the first and last `rows` elements, eliding the middle.
    pub fn preview(&self, rows: usize) -> String {
        let render = |items: &[T]| {
            items
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        if self.len() <= rows.saturating_mul(2) {
            format!("Set([{}])", render(&self.items))
        } else {
            format!(
                "Set([{}, ... {}])",
                render(&self.items[..rows]),
                render(&self.items[self.len() - rows..])
            )
        }
    }
}

/// Uses the default `preview_rows`; call `preview` to honor a configured value.
impl<T: fmt::Display> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.preview(PipelineConfig::default().preview_rows))
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Set<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<usize> for Set<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'s, T> IntoIterator for &'s Set<T> {
    type Item = &'s T;
    type IntoIter = std::slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Set<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}
