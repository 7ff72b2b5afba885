//! Hash join: group the lookup side, then match the driving side against it.

use std::hash::Hash;
use std::rc::Rc;

use rowpipe_core::{JoinedRecord, Record, Result};

use super::JoinKind;
use crate::aggregate::Grouper;

/// Join two record sources.
///
/// - `Inner`/`Left`: the right side is grouped, the left side drives.
/// - `Right`: the left side is grouped, the right side drives; the driving
///   record always lands in the `right` slot.
/// - `Outer`: both sides are grouped; keys are visited in left first-seen
///   order, then right-only keys in their first-seen order.
pub fn hash_join<L, R, K, LI, RI, FL, FR>(
    how: JoinKind,
    left: LI,
    right: RI,
    mut left_key: FL,
    mut right_key: FR,
) -> Result<Vec<JoinedRecord<L, R>>>
where
    L: Record,
    R: Record,
    K: Hash + Eq + Clone,
    LI: IntoIterator<Item = Result<L>>,
    RI: IntoIterator<Item = Result<R>>,
    FL: FnMut(&L) -> Result<K>,
    FR: FnMut(&R) -> Result<K>,
{
    let mut joined = Vec::new();

    match how {
        JoinKind::Inner | JoinKind::Left => {
            let lookup = group(right, &mut right_key)?;
            for row in left {
                let row = Rc::new(row?);
                match lookup.get(&left_key(&row)?) {
                    Some(matches) => {
                        for other in matches {
                            joined.push(JoinedRecord::new(Some(row.clone()), Some(other.clone())));
                        }
                    }
                    None if how == JoinKind::Left => joined.push(JoinedRecord::new(Some(row), None)),
                    None => {}
                }
            }
        }
        JoinKind::Right => {
            let lookup = group(left, &mut left_key)?;
            for row in right {
                let row = Rc::new(row?);
                match lookup.get(&right_key(&row)?) {
                    Some(matches) => {
                        for other in matches {
                            joined.push(JoinedRecord::new(Some(other.clone()), Some(row.clone())));
                        }
                    }
                    None => joined.push(JoinedRecord::new(None, Some(row))),
                }
            }
        }
        JoinKind::Outer => {
            let lefts = group(left, &mut left_key)?;
            let rights = group(right, &mut right_key)?;
            let mut keys: Vec<&K> = Vec::with_capacity(lefts.len() + rights.len());
            keys.extend(lefts.keys());
            keys.extend(rights.keys().filter(|k| !lefts.contains_key(k)));

            for key in keys {
                let left_side = sides(lefts.get(key));
                let right_side = sides(rights.get(key));
                for l in &left_side {
                    for r in &right_side {
                        joined.push(JoinedRecord::new(l.clone(), r.clone()));
                    }
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(kind = %how, output = joined.len(), "hash join");

    Ok(joined)
}

fn group<T, K, I, F>(rows: I, key_fn: &mut F) -> Result<Grouper<K, Rc<T>>>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = Result<T>>,
    F: FnMut(&T) -> Result<K>,
{
    let mut grouper = Grouper::new();
    for row in rows {
        let row = row?;
        let key = key_fn(&row)?;
        grouper.insert(key, Rc::new(row));
    }
    Ok(grouper)
}

/// Matches for one key, or a single absent placeholder.
fn sides<T>(group: Option<&[Rc<T>]>) -> Vec<Option<Rc<T>>> {
    match group {
        Some(rows) => rows.iter().cloned().map(Some).collect(),
        None => vec![None],
    }
}
