//! The record produced by joins.
//!
//! A `JoinedRecord` keeps shared handles to both source records and a merged
//! attribute view computed once at construction. Right-hand attributes are
//! applied first and left-hand ones after, so the left value wins whenever a
//! name exists on both sides.

use std::fmt;
use std::rc::Rc;

use crate::record::{Datum, Record};
use crate::types::Scalar;

#[derive(Debug)]
pub struct JoinedRecord<L, R> {
    left: Option<Rc<L>>,
    right: Option<Rc<R>>,
    merged: Datum,
}

impl<L: Record, R: Record> JoinedRecord<L, R> {
    /// Pair two records. Either side may be absent for left/right/outer joins.
    pub fn new(left: Option<Rc<L>>, right: Option<Rc<R>>) -> Self {
        let mut pairs: Vec<(String, Scalar)> = Vec::new();
        if let Some(r) = &right {
            pairs.extend(r.attrs().into_iter().map(|(n, v)| (n.to_string(), v.clone())));
        }
        if let Some(l) = &left {
            pairs.extend(l.attrs().into_iter().map(|(n, v)| (n.to_string(), v.clone())));
        }
        Self {
            left,
            right,
            merged: Datum::from_pairs(pairs),
        }
    }
}

impl<L, R> JoinedRecord<L, R> {
    pub fn left(&self) -> Option<&L> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&R> {
        self.right.as_deref()
    }

    /// Shared handle to the left record, for identity checks with `Rc::ptr_eq`.
    pub fn left_handle(&self) -> Option<&Rc<L>> {
        self.left.as_ref()
    }

    pub fn right_handle(&self) -> Option<&Rc<R>> {
        self.right.as_ref()
    }

    /// True when both sides are present.
    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn merged(&self) -> &Datum {
        &self.merged
    }
}

impl<L, R> Clone for JoinedRecord<L, R> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            merged: self.merged.clone(),
        }
    }
}

impl<L, R> Record for JoinedRecord<L, R> {
    fn get(&self, name: &str) -> Option<&Scalar> {
        self.merged.get(name)
    }

    fn attrs(&self) -> Vec<(&str, &Scalar)> {
        self.merged.attrs()
    }

    // Only the merged view changes; the source handles stay as they were.
    fn with_set(&self, name: &str, value: Scalar) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            merged: self.merged.with_set(name, value),
        }
    }

    fn without(&self, name: &str) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            merged: self.merged.without(name),
        }
    }
}

impl<L, R> fmt::Display for JoinedRecord<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match (self.left.is_some(), self.right.is_some()) {
            (true, true) => "both",
            (true, false) => "left",
            (false, true) => "right",
            (false, false) => "none",
        };
        write!(f, "Joined[{side}]{}", self.merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_attributes_win_on_collision() {
        let left = Rc::new(Datum::from_pairs([("a", 1), ("b", 2)]));
        let right = Rc::new(Datum::from_pairs([("b", 3), ("c", 4)]));
        let joined = JoinedRecord::new(Some(left.clone()), Some(right.clone()));

        assert_eq!(joined.get("a"), Some(&Scalar::I64(1)));
        assert_eq!(joined.get("b"), Some(&Scalar::I64(2)));
        assert_eq!(joined.get("c"), Some(&Scalar::I64(4)));
        assert!(Rc::ptr_eq(joined.left_handle().unwrap(), &left));
        assert_eq!(joined.right().unwrap().get("b"), Some(&Scalar::I64(3)));
    }

    #[test]
    fn absent_side_contributes_nothing() {
        let right = Rc::new(Datum::from_pairs([("c", 4)]));
        let joined: JoinedRecord<Datum, Datum> = JoinedRecord::new(None, Some(right));
        assert!(!joined.is_matched());
        assert!(joined.left().is_none());
        assert_eq!(joined.attrs().len(), 1);
    }

    #[test]
    fn with_set_keeps_sources() {
        let left = Rc::new(Datum::from_pairs([("a", 1)]));
        let joined: JoinedRecord<Datum, Datum> = JoinedRecord::new(Some(left), None);
        let updated = joined.with_set("a", Scalar::I64(9));
        assert_eq!(updated.get("a"), Some(&Scalar::I64(9)));
        assert_eq!(updated.left().unwrap().get("a"), Some(&Scalar::I64(1)));
    }
}
