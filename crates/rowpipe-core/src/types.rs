//! Dynamically typed attribute values.
//!
//! `Scalar` is hashable and totally ordered so it can serve as a group, join,
//! dedupe or sort key. Floats compare with `total_cmp`, and values of different
//! kinds order by a fixed kind rank. The loose comparison used by the condition
//! builder lives in `Scalar::compare`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    Int64,
    Float64,
    Utf8,
    List,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "null",
            DataType::Boolean => "bool",
            DataType::Int64 => "i64",
            DataType::Float64 => "f64",
            DataType::Utf8 => "str",
            DataType::List => "list",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
    List(Vec<Scalar>),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
            Scalar::List(_) => DataType::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Scalar::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Length of sized values: characters of a string, items of a list.
    pub fn len(&self) -> Option<usize> {
        match self {
            Scalar::Str(s) => Some(s.chars().count()),
            Scalar::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Membership test for container values.
    ///
    /// Strings test for a substring (the needle must be a string), lists test
    /// for an element equal to `needle`. Other kinds are not containers.
    pub fn contains(&self, needle: &Scalar) -> Option<bool> {
        match (self, needle) {
            (Scalar::Str(hay), Scalar::Str(n)) => Some(hay.contains(n.as_str())),
            (Scalar::Str(_), _) => None,
            (Scalar::List(items), n) => Some(items.iter().any(|item| item.loose_eq(n))),
            _ => None,
        }
    }

    /// Loose comparison: integers and floats share one numeric domain, other
    /// kinds only compare with themselves. `None` means "incomparable".
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (I64(a), I64(b)) => Some(a.cmp(b)),
            (I64(_), F64(_)) | (F64(_), I64(_)) | (F64(_), F64(_)) => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
            (Str(a), Str(b)) => Some(a.cmp(b)),
            (List(a), List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        other => return Some(other),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Equality under `compare`, so `I64(1)` equals `F64(1.0)` here.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Parse a text cell into the narrowest scalar it represents.
    ///
    /// Empty text is `Null`; `true`/`false` are booleans; then integers, then
    /// floats; anything else stays a string.
    pub fn infer(text: &str) -> Scalar {
        if text.is_empty() {
            return Scalar::Null;
        }
        match text {
            "true" | "True" | "TRUE" => return Scalar::Bool(true),
            "false" | "False" | "FALSE" => return Scalar::Bool(false),
            _ => {}
        }
        if let Ok(v) = text.parse::<i64>() {
            return Scalar::I64(v);
        }
        if let Ok(v) = text.parse::<f64>() {
            if v.is_finite() {
                return Scalar::F64(v);
            }
        }
        Scalar::Str(text.to_string())
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::I64(_) => 2,
            Scalar::F64(_) => 3,
            Scalar::Str(_) => 4,
            Scalar::List(_) => 5,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (F64(a), F64(b)) => a.total_cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Scalar::Null => {}
            Scalar::Bool(b) => b.hash(state),
            Scalar::I64(v) => v.hash(state),
            Scalar::F64(v) => v.to_bits().hash(state),
            Scalar::Str(s) => s.hash(state),
            Scalar::List(items) => items.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I64(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Scalar::I64(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Scalar {
    fn from(items: Vec<T>) -> Self {
        Scalar::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}
