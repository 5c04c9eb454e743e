use thiserror::Error;

/// Errors raised by [`CanonicalSet`](super::CanonicalSet) operations.
///
/// `E` is the error type of the set's [`Canonicalizer`](crate::Canonicalizer).
/// Absent keys and duplicate records are not errors: the mutating operations
/// report them through their `bool` return value.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    /// Strict keyed access found no record under the key.
    #[error("no record with canonical key '{0}'")]
    KeyNotFound(String),

    /// Positional access outside `0..len`.
    #[error("{}", range_message(.index, .len))]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of records at the time of the call.
        len: usize,
    },

    /// The canonicalizer rejected a record.
    #[error("canonicalization failed: {0}")]
    Canonicalize(#[source] E),
}

fn range_message(index: &usize, len: &usize) -> String {
    if *len == 0 {
        format!("index {index} is out of range: container is empty")
    } else {
        format!(
            "valid index must be between 0 and {}, but {index} was used",
            len - 1
        )
    }
}

impl<E> Error<E>
where
    E: std::error::Error + 'static,
{
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}
