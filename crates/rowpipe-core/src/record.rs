//! Records: named-attribute containers flowing through pipelines.
//!
//! Records are never mutated in place by operators. `with_set` and `without`
//! hand back a new record and leave the receiver untouched.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Scalar;

/// Attribute access shared by every record variant.
pub trait Record {
    /// Value of the named attribute, if present.
    fn get(&self, name: &str) -> Option<&Scalar>;

    /// All attributes in the variant's natural order.
    fn attrs(&self) -> Vec<(&str, &Scalar)>;

    /// A copy of this record with `name` set to `value`.
    fn with_set(&self, name: &str, value: Scalar) -> Self
    where
        Self: Sized;

    /// A copy of this record without `name`. Absent names are not an error.
    fn without(&self, name: &str) -> Self
    where
        Self: Sized;

    fn require(&self, name: &str) -> Result<&Scalar> {
        self.get(name).ok_or_else(|| Error::missing(name))
    }

    fn get_or(&self, name: &str, default: Scalar) -> Scalar {
        self.get(name).cloned().unwrap_or(default)
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Attribute-style record: fields keep their construction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    fields: Vec<(String, Scalar)>,
}

impl Datum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (name, value) pairs. A repeated name keeps its first
    /// position and takes the last value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        let mut datum = Datum::new();
        for (name, value) in pairs {
            datum.put(name.into(), value.into());
        }
        datum
    }

    /// Build from a mapping. Field order follows the mapping's iteration order,
    /// so pass an ordered map when order matters.
    pub fn from_map<K, V, I>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        Self::from_pairs(map)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    // Construction-time insert; operators go through `with_set`.
    fn put(&mut self, name: String, value: Scalar) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }
}

impl Record for Datum {
    fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    fn attrs(&self) -> Vec<(&str, &Scalar)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    fn with_set(&self, name: &str, value: Scalar) -> Self {
        let mut next = self.clone();
        next.put(name.to_string(), value);
        next
    }

    fn without(&self, name: &str) -> Self {
        Datum {
            fields: self
                .fields
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Datum {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Datum::from_pairs(iter)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Datum({{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}})")
    }
}

/// Mapping-style record backed by a hash map. Attribute order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    entries: HashMap<String, Scalar>,
}

impl MapRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, Scalar> {
        self.entries
    }
}

impl From<HashMap<String, Scalar>> for MapRecord {
    fn from(entries: HashMap<String, Scalar>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for MapRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Record for MapRecord {
    fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries.get(name)
    }

    fn attrs(&self) -> Vec<(&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn with_set(&self, name: &str, value: Scalar) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(name.to_string(), value);
        Self { entries }
    }

    fn without(&self, name: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.remove(name);
        Self { entries }
    }
}
