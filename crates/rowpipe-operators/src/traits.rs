//! Default stage functions and the `IntoStream` conversion.

use rowpipe_core::Result;

use crate::stream::Stream;

/// Default predicate of a stage: every element passes.
pub fn always<T>(_row: &T) -> Result<bool> {
    Ok(true)
}

/// Default transform of a stage: elements pass through unchanged.
pub fn identity<T>(row: T) -> Result<T> {
    Ok(row)
}

/// Anything iterable can become the source of a pipeline.
pub trait IntoStream<'a, T> {
    fn into_stream(self) -> Stream<'a, T>;
}

impl<'a, T: 'a, I> IntoStream<'a, T> for I
where
    I: IntoIterator<Item = T>,
    I::IntoIter: 'a,
{
    fn into_stream(self) -> Stream<'a, T> {
        Stream::new(self)
    }
}
