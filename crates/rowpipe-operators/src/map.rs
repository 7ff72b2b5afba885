//! Record-level transforms: set, project, delete.
//!
//! Each transform builds a new record per row; inputs are never modified.

use rowpipe_core::{Datum, Record, Scalar};

use crate::stream::Stream;

impl<'a, T: Record + 'a> Stream<'a, T> {
    /// Set `name` on every record to the value computed by `f`.
    pub fn set(self, name: &str, mut f: impl FnMut(&T) -> Scalar + 'a) -> Stream<'a, T> {
        let name = name.to_string();
        self.map(move |row| {
            let value = f(&row);
            row.with_set(&name, value)
        })
    }

    /// Set `name` on every record to the same value.
    pub fn set_value(self, name: &str, value: impl Into<Scalar>) -> Stream<'a, T> {
        let value = value.into();
        self.set(name, move |_| value.clone())
    }

    /// Project every record to the value of `name`; `AttributeMissing` if absent.
    pub fn get(self, name: &str) -> Stream<'a, Scalar> {
        let name = name.to_string();
        self.try_map(move |row| row.require(&name).cloned())
    }

    /// Project every record to the value of `name`, or `default` when absent.
    pub fn get_or(self, name: &str, default: impl Into<Scalar>) -> Stream<'a, Scalar> {
        let name = name.to_string();
        let default = default.into();
        self.map(move |row| row.get_or(&name, default.clone()))
    }

    pub fn delete(self, name: &str) -> Stream<'a, T> {
        let name = name.to_string();
        self.map(move |row| row.without(&name))
    }

    /// Keep only `names`, in the order given.
    pub fn pick_attrs(self, names: &[&str]) -> Stream<'a, Datum> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        self.try_map(move |row| {
            let mut picked = Vec::with_capacity(names.len());
            for name in &names {
                picked.push((name.as_str(), row.require(name)?.clone()));
            }
            Ok(Datum::from_pairs(picked))
        })
    }
}
