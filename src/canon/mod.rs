//! Canonical key derivation for set membership.
//!
//! A [`Canonicalizer`] projects a record onto a string that is identical for
//! every record considered the same structure. The projection is supplied by
//! the caller; this crate ships a property-backed implementation
//! ([`PropertyKey`]) and a closure adapter ([`FromFn`]).
//!
//! Implementations must be deterministic: the same record under the same
//! chirality flag always yields the same key, across calls and across runs.
//! [`CanonicalSet`](crate::CanonicalSet) trusts this contract and never
//! re-validates it.

mod property;

pub use property::{KeyError, PropertyKey};

use std::fmt;
use std::marker::PhantomData;

/// Derives the canonical identity of a record.
pub trait Canonicalizer {
    /// The record type keyed by this canonicalizer.
    type Record;

    /// Failure raised for records that cannot be keyed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the canonical key of `record`.
    ///
    /// When `preserve_chirality` is `false`, stereochemical distinctions must
    /// not influence the key.
    fn canonicalize(
        &self,
        record: &Self::Record,
        preserve_chirality: bool,
    ) -> Result<String, Self::Error>;
}

/// A [`Canonicalizer`] backed by a closure.
///
/// Created with [`from_fn`].
pub struct FromFn<R, E, F> {
    f: F,
    _marker: PhantomData<fn(&R) -> E>,
}

/// Wraps `f` as a [`Canonicalizer`].
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use molset::canon::{Canonicalizer, from_fn};
///
/// let lowercase = from_fn(|s: &String, _| Ok::<_, Infallible>(s.to_lowercase()));
/// assert_eq!(lowercase.canonicalize(&"CCO".to_string(), true).unwrap(), "cco");
/// ```
pub fn from_fn<R, E, F>(f: F) -> FromFn<R, E, F>
where
    F: Fn(&R, bool) -> Result<String, E>,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

impl<R, E, F> Canonicalizer for FromFn<R, E, F>
where
    F: Fn(&R, bool) -> Result<String, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Record = R;
    type Error = E;

    fn canonicalize(&self, record: &R, preserve_chirality: bool) -> Result<String, E> {
        (self.f)(record, preserve_chirality)
    }
}

impl<R, E, F: Clone> Clone for FromFn<R, E, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R, E, F> fmt::Debug for FromFn<R, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}
