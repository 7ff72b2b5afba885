//! The lazy, single-pass stream and its composition operators.
//!
//! Every operator consumes the receiver and returns a new `Stream` whose
//! upstream is the receiver. Pulling from the tail pulls through every stage
//! back to the source: an element failing a predicate is skipped without being
//! transformed, and errors are forwarded unchanged.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use rowpipe_core::hash::unit_interval;
use rowpipe_core::{Error, Result};

use crate::set::Set;
use crate::traits::{always, identity};

type Source<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

pub struct Stream<'a, T> {
    source: Source<'a, T>,
}

/// One link of the chain: upstream, a predicate and a transform.
struct Stage<'a, S, T, P, F> {
    upstream: Stream<'a, S>,
    predicate: P,
    transform: F,
    _out: PhantomData<fn() -> T>,
}

impl<'a, S, T, P, F> Iterator for Stage<'a, S, T, P, F>
where
    P: FnMut(&S) -> Result<bool>,
    F: FnMut(S) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        loop {
            let row = match self.upstream.source.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };
            match (self.predicate)(&row) {
                Ok(true) => return Some((self.transform)(row)),
                Ok(false) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<'a, T: 'a> Stream<'a, T> {
    /// Stream over an infallible source.
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self {
            source: Box::new(source.into_iter().map(Ok)),
        }
    }

    /// Stream over a source whose items may already carry errors.
    pub fn from_results<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'a,
    {
        Self {
            source: Box::new(source.into_iter()),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Append one stage with an explicit predicate and transform.
    ///
    /// The predicate runs first; only passing elements reach the transform.
    pub fn stage<U, P, F>(self, predicate: P, transform: F) -> Stream<'a, U>
    where
        U: 'a,
        P: FnMut(&T) -> Result<bool> + 'a,
        F: FnMut(T) -> Result<U> + 'a,
    {
        Stream {
            source: Box::new(Stage {
                upstream: self,
                predicate,
                transform,
                _out: PhantomData,
            }),
        }
    }

    pub fn map<U: 'a>(self, mut f: impl FnMut(T) -> U + 'a) -> Stream<'a, U> {
        self.stage(always, move |row| Ok(f(row)))
    }

    pub fn try_map<U: 'a>(self, f: impl FnMut(T) -> Result<U> + 'a) -> Stream<'a, U> {
        self.stage(always, f)
    }

    pub fn filter(self, mut p: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        self.stage(move |row: &T| Ok(p(row)), identity)
    }

    pub fn try_filter(self, p: impl FnMut(&T) -> Result<bool> + 'a) -> Stream<'a, T> {
        self.stage(p, identity)
    }

    /// Keep elements passing every predicate. Evaluation stops at the first
    /// failing predicate.
    pub fn filters(self, mut predicates: Vec<Box<dyn FnMut(&T) -> bool + 'a>>) -> Stream<'a, T> {
        self.filter(move |row| predicates.iter_mut().all(|p| p(row)))
    }

    /// Call `f` on each element as it passes; elements are not changed.
    pub fn for_each(self, mut f: impl FnMut(&T) + 'a) -> Stream<'a, T> {
        self.map(move |row| {
            f(&row);
            row
        })
    }

    /// Yield at most `n` elements. Never pulls past the `n`-th.
    pub fn take(self, n: usize) -> Stream<'a, T> {
        Stream {
            source: Box::new(self.source.take(n)),
        }
    }

    /// Skip the first `n` elements. Errors are not counted and pass through.
    pub fn drop(self, n: usize) -> Stream<'a, T> {
        let mut remaining = n;
        Stream {
            source: Box::new(self.source.filter(move |row| {
                if remaining > 0 && row.is_ok() {
                    remaining -= 1;
                    return false;
                }
                true
            })),
        }
    }

    /// Pull one element now.
    pub fn pull(&mut self) -> Result<T> {
        self.source.next().unwrap_or(Err(Error::Exhausted))
    }

    /// Pull exactly `n` elements now. The stream stays usable afterwards.
    pub fn take_now(&mut self, n: usize) -> Result<Set<T>> {
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(self.pull()?);
        }
        Ok(Set::from(items))
    }

    pub fn collect(self) -> Result<Set<T>> {
        self.to_list().map(Set::from)
    }

    /// Post-map each element through `ctor`, then materialize.
    pub fn collect_as<U: 'a>(self, ctor: impl FnMut(T) -> U + 'a) -> Result<Set<U>> {
        self.map(ctor).collect()
    }

    pub fn to_list(self) -> Result<Vec<T>> {
        self.source.collect()
    }

    /// Drain the stream for its side effects.
    pub fn execute(self) -> Result<()> {
        for row in self.source {
            row?;
        }
        Ok(())
    }

    pub fn reduce<U>(self, mut f: impl FnMut(U, T) -> U, initial: U) -> Result<U> {
        let mut acc = initial;
        for row in self.source {
            acc = f(acc, row?);
        }
        Ok(acc)
    }

    /// Keep each element with `probability`, yielding at most `n`.
    ///
    /// Each element's coin is derived from `(seed, position)`, so a seed
    /// reproduces the same sample.
    pub fn sample(self, probability: f64, n: usize, seed: u64) -> Result<Stream<'a, T>> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::InvalidArgument(format!(
                "sample probability must be within [0, 1], got {probability}"
            )));
        }
        let mut position = 0u64;
        Ok(self
            .filter(move |_| {
                let coin = unit_interval(seed, position);
                position += 1;
                coin < probability
            })
            .take(n))
    }
}

impl<'a, T: Hash + Eq + 'a> Stream<'a, T> {
    pub fn to_set(self) -> Result<HashSet<T>> {
        self.source.collect()
    }
}

impl<'a, K: Hash + Eq + 'a, V: 'a> Stream<'a, (K, V)> {
    /// Build a map from a pair stream; a repeated key keeps its last value.
    pub fn to_dict(self) -> Result<HashMap<K, V>> {
        self.source.collect()
    }
}

impl<'a, I> Stream<'a, I>
where
    I: IntoIterator + 'a,
    I::IntoIter: 'a,
    I::Item: 'a,
{
    /// Flatten one level. Each inner sequence is drained before the next
    /// outer element is pulled.
    pub fn concat(self) -> Stream<'a, I::Item> {
        Stream {
            source: Box::new(self.source.flat_map(|row| -> Source<'a, I::Item> {
                match row {
                    Ok(inner) => Box::new(inner.into_iter().map(Ok)),
                    Err(e) => Box::new(std::iter::once(Err(e))),
                }
            })),
        }
    }
}

impl<'a, T: 'a> Stream<'a, T> {
    pub fn concat_map<I>(self, f: impl FnMut(T) -> I + 'a) -> Stream<'a, I::Item>
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: 'a,
    {
        self.map(f).concat()
    }
}

impl<'a, T> IntoIterator for Stream<'a, T> {
    type Item = Result<T>;
    type IntoIter = Source<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.source
    }
}

impl<'a, T> fmt::Debug for Stream<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn filter_then_map() {
        let out = Stream::new(0..10)
            .filter(|n| n % 2 == 0)
            .map(|n| n * 5)
            .to_list()
            .unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn failing_predicate_skips_transform() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let out = Stream::new(0..6)
            .filter(|n| *n >= 3)
            .map(move |n| {
                seen.set(seen.get() + 1);
                n
            })
            .to_list()
            .unwrap();
        assert_eq!(out, vec![3, 4, 5]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn take_does_not_pull_past_n() {
        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let out = Stream::new(0..1_000_000)
            .for_each(move |_| counter.set(counter.get() + 1))
            .take(3)
            .to_list()
            .unwrap();
        assert_eq!(out, vec![0, 1, 2]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn drop_skips_front() {
        assert_eq!(Stream::new(0..10).drop(5).to_list().unwrap(), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn drop_forwards_errors_without_counting_them() {
        let source = vec![Err(Error::IoLike("bad row".into())), Ok(1), Ok(2)];
        let out = Stream::from_results(source.clone()).drop(1).to_list();
        assert_eq!(out, Err(Error::IoLike("bad row".into())));

        let mut stream = Stream::from_results(source).drop(1);
        assert!(stream.pull().is_err());
        assert_eq!(stream.pull(), Ok(2));
        assert_eq!(stream.pull(), Err(Error::Exhausted));
    }

    #[test]
    fn take_now_is_eager_and_reports_exhaustion() {
        let mut stream = Stream::new(0..5);
        assert_eq!(stream.take_now(3).unwrap().into_vec(), vec![0, 1, 2]);
        assert_eq!(stream.take_now(3).unwrap_err(), Error::Exhausted);
    }

    #[test]
    fn pull_after_end_is_exhausted() {
        let mut stream = Stream::new(vec![1]);
        assert_eq!(stream.pull(), Ok(1));
        assert_eq!(stream.pull(), Err(Error::Exhausted));
        assert_eq!(stream.pull(), Err(Error::Exhausted));
    }

    #[test]
    fn errors_propagate_through_stages() {
        let out = Stream::new(vec![1, 2, 3])
            .try_map(|n| {
                if n == 2 {
                    Err(Error::missing("n"))
                } else {
                    Ok(n)
                }
            })
            .map(|n| n + 1)
            .to_list();
        assert_eq!(out, Err(Error::missing("n")));
    }

    #[test]
    fn concat_map_drains_inner_in_order() {
        let out = Stream::new(vec!["ab", "", "cde"])
            .concat_map(|w| w.chars().collect::<Vec<_>>())
            .to_list()
            .unwrap();
        assert_eq!(out, vec!['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn filters_require_every_predicate() {
        let below_six: Box<dyn FnMut(&i32) -> bool> = Box::new(|n| *n < 6);
        let even: Box<dyn FnMut(&i32) -> bool> = Box::new(|n| n % 2 == 0);
        let out = Stream::new(0..10)
            .filters(vec![below_six, even])
            .to_list()
            .unwrap();
        assert_eq!(out, vec![0, 2, 4]);
    }

    #[test]
    fn reduce_folds() {
        let total = Stream::new(1..=4).reduce(|acc, n| acc + n, 0).unwrap();
        assert_eq!(total, 10);
    }

    #[test]
    fn terminal_conversions() {
        let set = Stream::new(vec![1, 2, 3, 4, 2, 3]).to_set().unwrap();
        assert_eq!(set.len(), 4);
        let dict = Stream::new(vec![("a", 1), ("b", 2), ("a", 3)]).to_dict().unwrap();
        assert_eq!(dict["a"], 3);
        assert_eq!(dict["b"], 2);
    }

    #[test]
    fn sample_is_seeded_and_bounded() {
        let first = Stream::new(0..1000).sample(0.1, 5, 7).unwrap().to_list().unwrap();
        let second = Stream::new(0..1000).sample(0.1, 5, 7).unwrap().to_list().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!(Stream::new(0..10).sample(1.5, 1, 0).is_err());
        assert!(Stream::new(0..10).sample(0.0, 10, 0).unwrap().to_list().unwrap().is_empty());
    }
}
