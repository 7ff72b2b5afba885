//! Sliding windows and fixed-size batches over a stream.
//!
//! The buffer holds at most `length` elements. The first snapshot is taken
//! after pre-filling up to `length` elements; each later snapshot evicts up to
//! `interval` of the oldest elements and pulls up to `interval` new ones.
//! Running out of input mid-refill emits one last snapshot (if anything is
//! buffered) and ends the window. Snapshots are built only on demand.

use std::collections::VecDeque;

use rowpipe_core::{Error, Result};

use crate::set::Set;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    Fresh,
    Sliding,
    Done,
}

/// Iterator of window snapshots. Built by `Stream::window` and `Stream::batch`.
pub struct Windows<'a, T> {
    upstream: Stream<'a, T>,
    buffer: VecDeque<T>,
    length: usize,
    interval: usize,
    state: WindowState,
}

impl<'a, T: Clone + 'a> Windows<'a, T> {
    pub fn new(upstream: Stream<'a, T>, length: usize, interval: usize) -> Result<Self> {
        if length == 0 || interval == 0 {
            return Err(Error::InvalidArgument(format!(
                "window length and interval must be positive, got length={length} interval={interval}"
            )));
        }
        Ok(Self {
            upstream,
            buffer: VecDeque::with_capacity(length),
            length,
            interval,
            state: WindowState::Fresh,
        })
    }

    fn snapshot(&self) -> Set<T> {
        self.buffer.iter().cloned().collect()
    }

    // Pulls one element. `Ok(None)` is the end of the source; the window
    // recovers it to decide on a final snapshot.
    fn pull(&mut self) -> Result<Option<T>> {
        match self.upstream.pull() {
            Ok(row) => Ok(Some(row)),
            Err(Error::Exhausted) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn push(&mut self, row: T) {
        self.buffer.push_back(row);
        if self.buffer.len() > self.length {
            self.buffer.pop_front();
        }
    }

    fn prefill(&mut self) -> Result<Option<Set<T>>> {
        while self.buffer.len() < self.length {
            match self.pull()? {
                Some(row) => self.push(row),
                None => {
                    // A short source fits in one snapshot.
                    self.state = WindowState::Done;
                    break;
                }
            }
        }
        if self.state == WindowState::Fresh {
            self.state = WindowState::Sliding;
        }
        if self.buffer.is_empty() {
            self.state = WindowState::Done;
            return Ok(None);
        }
        Ok(Some(self.snapshot()))
    }

    fn slide(&mut self) -> Result<Option<Set<T>>> {
        let evict = self.interval.min(self.buffer.len());
        self.buffer.drain(..evict);

        for _ in 0..self.interval {
            match self.pull()? {
                Some(row) => self.push(row),
                None => {
                    self.state = WindowState::Done;
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
            }
        }
        Ok(Some(self.snapshot()))
    }
}

impl<'a, T: Clone + 'a> Iterator for Windows<'a, T> {
    type Item = Result<Set<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.state {
            WindowState::Done => return None,
            WindowState::Fresh => self.prefill(),
            WindowState::Sliding => self.slide(),
        };
        match step {
            Ok(Some(snapshot)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(size = snapshot.len(), length = self.length, "window snapshot");
                Some(Ok(snapshot))
            }
            Ok(None) => None,
            Err(e) => {
                self.state = WindowState::Done;
                Some(Err(e))
            }
        }
    }
}

impl<'a, T: Clone + 'a> Stream<'a, T> {
    /// Snapshots of a sliding buffer of `length` elements, advancing by `interval`.
    pub fn window(self, length: usize, interval: usize) -> Result<Stream<'a, Set<T>>> {
        Ok(Stream::from_results(Windows::new(self, length, interval)?))
    }

    /// Non-overlapping chunks of `size`; the last chunk may be shorter.
    pub fn batch(self, size: usize) -> Result<Stream<'a, Set<T>>> {
        self.window(size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn windows(len: usize, length: usize, interval: usize) -> Vec<Vec<i32>> {
        Stream::new(0..len as i32)
            .window(length, interval)
            .unwrap()
            .map(Set::into_vec)
            .to_list()
            .unwrap()
    }

    #[test]
    fn window_three_by_two() {
        assert_eq!(
            windows(10, 3, 2),
            vec![vec![0, 1, 2], vec![2, 3, 4], vec![4, 5, 6], vec![6, 7, 8], vec![8, 9]]
        );
    }

    #[test]
    fn batch_leaves_short_tail() {
        let out = Stream::new(0..9)
            .batch(2)
            .unwrap()
            .map(Set::into_vec)
            .to_list()
            .unwrap();
        assert_eq!(out, vec![vec![0, 1], vec![2, 3], vec![4, 5], vec![6, 7], vec![8]]);
    }

    #[test]
    fn batch_on_exact_multiple_has_no_empty_tail() {
        assert_eq!(windows(4, 2, 2), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn short_source_yields_one_partial_window() {
        assert_eq!(windows(2, 5, 1), vec![vec![0, 1]]);
        assert!(windows(0, 3, 1).is_empty());
    }

    #[test]
    fn interval_longer_than_length_skips_ahead() {
        assert_eq!(windows(8, 2, 3), vec![vec![0, 1], vec![3, 4], vec![6, 7]]);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(matches!(
            Stream::new(0..3).window(0, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Stream::new(0..3).batch(0).is_err());
    }

    #[test]
    fn snapshots_are_pulled_on_demand() {
        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let mut windows = Stream::new(0..100)
            .for_each(move |_| counter.set(counter.get() + 1))
            .window(3, 2)
            .unwrap();
        assert_eq!(pulled.get(), 0);
        windows.pull().unwrap();
        assert_eq!(pulled.get(), 3);
        windows.pull().unwrap();
        assert_eq!(pulled.get(), 5);
    }

    #[test]
    fn upstream_errors_end_the_window() {
        let source = vec![Ok(1), Err(Error::missing("x")), Ok(3)];
        let mut windows = Stream::from_results(source).window(2, 1).unwrap();
        assert_eq!(windows.pull().unwrap_err(), Error::missing("x"));
        assert_eq!(windows.pull().unwrap_err(), Error::Exhausted);
    }
}
