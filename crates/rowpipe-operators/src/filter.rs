//! Attribute-bound condition builder.
//!
//! `stream.where_attr("age").gt(18)` is shorthand for a `try_filter` whose
//! predicate looks up `age` on each record and compares it with `18`.
//! A record lacking the attribute fails the pipeline with `AttributeMissing`.

use std::cmp::Ordering;

use rowpipe_core::types::DataType;
use rowpipe_core::{Error, Record, Result, Scalar};

use crate::stream::Stream;

/// Builder returned by `Stream::where_attr`. Every method consumes the
/// builder and returns the filtered stream.
pub struct AttributeRadix<'a, T> {
    stream: Stream<'a, T>,
    name: String,
}

impl<'a, T: Record + 'a> Stream<'a, T> {
    pub fn where_attr(self, name: &str) -> AttributeRadix<'a, T> {
        AttributeRadix {
            stream: self,
            name: name.to_string(),
        }
    }
}

impl<'a, T: Record + 'a> AttributeRadix<'a, T> {
    fn apply(self, mut test: impl FnMut(&Scalar) -> Result<bool> + 'a) -> Stream<'a, T> {
        let name = self.name;
        self.stream.try_filter(move |row| test(row.require(&name)?))
    }

    fn ordered(self, value: impl Into<Scalar>, accept: fn(Ordering) -> bool) -> Stream<'a, T> {
        let value = value.into();
        self.apply(move |v| {
            v.compare(&value).map(accept).ok_or_else(|| {
                Error::TypeMismatch(format!("cannot order {} against {}", v.data_type(), value.data_type()))
            })
        })
    }

    fn sized(self, n: usize, accept: fn(usize, usize) -> bool) -> Stream<'a, T> {
        self.apply(move |v| {
            v.len()
                .map(|len| accept(len, n))
                .ok_or_else(|| Error::TypeMismatch(format!("{} has no length", v.data_type())))
        })
    }

    fn membership(self, needle: impl Into<Scalar>, expect: bool) -> Stream<'a, T> {
        let needle = needle.into();
        self.apply(move |v| {
            v.contains(&needle).map(|found| found == expect).ok_or_else(|| {
                Error::TypeMismatch(format!("{} cannot contain {}", v.data_type(), needle.data_type()))
            })
        })
    }

    pub fn eq(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        let value = value.into();
        self.apply(move |v| Ok(v.loose_eq(&value)))
    }

    pub fn neq(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        let value = value.into();
        self.apply(move |v| Ok(!v.loose_eq(&value)))
    }

    pub fn gt(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        self.ordered(value, Ordering::is_gt)
    }

    pub fn gteq(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        self.ordered(value, Ordering::is_ge)
    }

    pub fn lt(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        self.ordered(value, Ordering::is_lt)
    }

    pub fn lteq(self, value: impl Into<Scalar>) -> Stream<'a, T> {
        self.ordered(value, Ordering::is_le)
    }

    /// Keep records whose value equals one of `values`.
    pub fn is_in<V: Into<Scalar>>(self, values: impl IntoIterator<Item = V>) -> Stream<'a, T> {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        self.apply(move |v| Ok(values.iter().any(|x| v.loose_eq(x))))
    }

    pub fn not_in<V: Into<Scalar>>(self, values: impl IntoIterator<Item = V>) -> Stream<'a, T> {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        self.apply(move |v| Ok(!values.iter().any(|x| v.loose_eq(x))))
    }

    /// Substring test on strings, element test on lists.
    pub fn contains(self, needle: impl Into<Scalar>) -> Stream<'a, T> {
        self.membership(needle, true)
    }

    pub fn doesnt_contain(self, needle: impl Into<Scalar>) -> Stream<'a, T> {
        self.membership(needle, false)
    }

    pub fn len_eq(self, n: usize) -> Stream<'a, T> {
        self.sized(n, |len, n| len == n)
    }

    pub fn len_gt(self, n: usize) -> Stream<'a, T> {
        self.sized(n, |len, n| len > n)
    }

    pub fn len_lt(self, n: usize) -> Stream<'a, T> {
        self.sized(n, |len, n| len < n)
    }

    pub fn len_gteq(self, n: usize) -> Stream<'a, T> {
        self.sized(n, |len, n| len >= n)
    }

    pub fn len_lteq(self, n: usize) -> Stream<'a, T> {
        self.sized(n, |len, n| len <= n)
    }

    pub fn is_null(self) -> Stream<'a, T> {
        self.apply(|v| Ok(v.is_null()))
    }

    pub fn is_not_null(self) -> Stream<'a, T> {
        self.apply(|v| Ok(!v.is_null()))
    }

    pub fn is_type(self, kind: DataType) -> Stream<'a, T> {
        self.apply(move |v| Ok(v.data_type() == kind))
    }

    pub fn not_type(self, kind: DataType) -> Stream<'a, T> {
        self.apply(move |v| Ok(v.data_type() != kind))
    }
}
