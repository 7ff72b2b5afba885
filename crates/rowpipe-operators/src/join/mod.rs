//! Relational joins between two streams.
//!
//! All four kinds share one building block: group the lookup side by key,
//! then walk the driving side and pair every match. A key present several
//! times on both sides yields the full cross product for that key.

pub mod hash;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rowpipe_core::{Error, JoinedRecord, Record, Result, Scalar};

use crate::set::Set;
use crate::stream::Stream;

pub use hash::hash_join;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "outer" => Ok(JoinKind::Outer),
            other => Err(Error::InvalidArgument(format!(
                "invalid value for how: {other}, must be left, right, inner, or outer"
            ))),
        }
    }
}

impl<'a, L: Record + 'a> Stream<'a, L> {
    /// Join with `right` using one key function per side.
    ///
    /// Key functions return `Result` so attribute lookups can fail; the first
    /// failure aborts the join.
    pub fn join_by<R, K, FL, FR>(
        self,
        how: JoinKind,
        left_key: FL,
        right_key: FR,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>>
    where
        R: Record,
        K: Hash + Eq + Clone,
        FL: FnMut(&L) -> Result<K>,
        FR: FnMut(&R) -> Result<K>,
    {
        hash_join(how, self, right, left_key, right_key).map(Set::from)
    }

    /// Join on equal values of the attribute `key`, present on both sides.
    pub fn join<R: Record>(
        self,
        how: JoinKind,
        key: &str,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>> {
        self.join_by(how, attr_key(key), attr_key(key), right)
    }

    pub fn inner_join<R: Record>(
        self,
        key: &str,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>> {
        self.join(JoinKind::Inner, key, right)
    }

    pub fn left_join<R: Record>(
        self,
        key: &str,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>> {
        self.join(JoinKind::Left, key, right)
    }

    pub fn right_join<R: Record>(
        self,
        key: &str,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>> {
        self.join(JoinKind::Right, key, right)
    }

    pub fn outer_join<R: Record>(
        self,
        key: &str,
        right: Stream<'_, R>,
    ) -> Result<Set<JoinedRecord<L, R>>> {
        self.join(JoinKind::Outer, key, right)
    }
}

fn attr_key<T: Record>(name: &str) -> impl FnMut(&T) -> Result<Scalar> + '_ {
    move |row| row.require(name).cloned()
}
