//! Insertion-ordered record collections deduplicated by canonical key.
//!
//! [`CanonicalSet`] stores each record under the key its [`Canonicalizer`]
//! derives for it. Two records with the same key are the same member, no
//! matter which instance was inserted. Keys keep their first-insertion order,
//! so the set can also be addressed by position like a sequence.
//!
//! # Seal
//!
//! Every set carries an advisory `sealed` flag. Successful structural
//! mutations (a new key, a replacement, a removal, a pop, clearing a
//! non-empty set) break the seal; failed or no-op operations leave it alone.
//! Owners restore it with [`CanonicalSet::seal`] once they have processed the
//! changes. The flag has no effect on any other operation.
//!
//! # Sharing
//!
//! Records are held as [`Arc`]s. Copies of a set ([`CanonicalSet::copy`], set
//! algebra results) own an independent key map but share record handles with
//! the set they came from.

mod error;
mod ops;


pub use error::Error;

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canon::Canonicalizer;

type SetResult<T, C> = Result<T, Error<<C as Canonicalizer>::Error>>;

/// Construction options for a [`CanonicalSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetConfig {
    /// Passed to every canonicalizer call made by the set.
    pub preserve_chirality: bool,
    /// Initial value of the seal flag.
    pub sealed: bool,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            preserve_chirality: true,
            sealed: true,
        }
    }
}

/// Addresses a record either by canonical key or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Locator<'a> {
    fn from(key: &'a str) -> Self {
        Locator::Key(key)
    }
}

impl<'a> From<&'a String> for Locator<'a> {
    fn from(key: &'a String) -> Self {
        Locator::Key(key)
    }
}

impl From<usize> for Locator<'_> {
    fn from(index: usize) -> Self {
        Locator::Index(index)
    }
}

/// An insertion-ordered set of records unique by canonical key.
///
/// Key lookups are O(1); positional access and order-preserving removals are
/// O(n).
pub struct CanonicalSet<C: Canonicalizer> {
    canonicalizer: C,
    entries: IndexMap<String, Arc<C::Record>>,
    preserve_chirality: bool,
    sealed: bool,
}

impl<C: Canonicalizer> CanonicalSet<C> {
    /// Creates an empty, sealed set that preserves chirality.
    pub fn new(canonicalizer: C) -> Self {
        Self::with_config(canonicalizer, SetConfig::default())
    }

    pub fn with_config(canonicalizer: C, config: SetConfig) -> Self {
        Self {
            canonicalizer,
            entries: IndexMap::new(),
            preserve_chirality: config.preserve_chirality,
            sealed: config.sealed,
        }
    }

    /// Builds a set by adding `records` in order.
    ///
    /// Duplicates collapse onto the first record with their key. The seal is
    /// broken as soon as one record was offered, even if nothing new was
    /// stored.
    pub fn from_records<I>(canonicalizer: C, config: SetConfig, records: I) -> SetResult<Self, C>
    where
        I: IntoIterator,
        I::Item: Into<Arc<C::Record>>,
    {
        let mut set = Self::with_config(canonicalizer, config);
        let mut offered = 0usize;
        for record in records {
            set.add(record)?;
            offered += 1;
        }
        if offered > 0 {
            set.sealed = false;
        }
        debug!(offered, unique = set.len(), "built canonical set from records");
        Ok(set)
    }

    pub fn canonicalizer(&self) -> &C {
        &self.canonicalizer
    }

    pub fn preserve_chirality(&self) -> bool {
        self.preserve_chirality
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Marks the current contents as processed.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn set_sealed(&mut self, sealed: bool) {
        self.sealed = sealed;
    }

    /// Computes the key `record` would be stored under in this set.
    pub fn canonical_key(&self, record: &C::Record) -> SetResult<String, C> {
        self.canonicalizer
            .canonicalize(record, self.preserve_chirality)
            .map_err(Error::Canonicalize)
    }

    /// Adds `record` unless its key is already present.
    ///
    /// Returns `true` if the record was stored.
    pub fn add(&mut self, record: impl Into<Arc<C::Record>>) -> SetResult<bool, C> {
        self.insert(record.into(), false).map(|(_, added)| added)
    }

    /// Like [`add`](Self::add), also returning the key the record maps to.
    ///
    /// When the record is rejected as a duplicate, the key addresses the
    /// member that was kept.
    pub fn add_keyed(
        &mut self,
        record: impl Into<Arc<C::Record>>,
    ) -> SetResult<(String, bool), C> {
        self.insert(record.into(), false)
    }

    /// Stores `record`, replacing any record with the same key.
    ///
    /// A replaced record keeps its position. Always returns `true` and always
    /// breaks the seal, even when the size is unchanged.
    pub fn add_replacing(&mut self, record: impl Into<Arc<C::Record>>) -> SetResult<bool, C> {
        self.insert(record.into(), true).map(|(_, added)| added)
    }

    /// Adds every record, returning how many were new.
    pub fn add_all<I>(&mut self, records: I) -> SetResult<usize, C>
    where
        I: IntoIterator,
        I::Item: Into<Arc<C::Record>>,
    {
        let mut added = 0;
        for record in records {
            if self.add(record)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn insert(&mut self, record: Arc<C::Record>, replace: bool) -> SetResult<(String, bool), C> {
        let key = self.canonical_key(&record)?;
        if !replace && self.entries.contains_key(&key) {
            trace!(%key, "rejected duplicate record");
            return Ok((key, false));
        }
        self.entries.insert(key.clone(), record);
        self.sealed = false;
        Ok((key, true))
    }

    /// Removes the record stored under `key`.
    pub fn remove_key(&mut self, key: &str) -> bool {
        if self.entries.shift_remove(key).is_some() {
            self.sealed = false;
            true
        } else {
            false
        }
    }

    /// Removes the member with the same canonical key as `record`.
    pub fn remove(&mut self, record: &C::Record) -> SetResult<bool, C> {
        let key = self.canonical_key(record)?;
        Ok(self.remove_key(&key))
    }

    /// Removes every record in `records`.
    ///
    /// All removals are attempted; the result is `true` only if each record
    /// was present. An empty input trivially succeeds. A canonicalization
    /// failure stops the batch, leaving earlier removals applied.
    pub fn remove_all<'a, I>(&mut self, records: I) -> SetResult<bool, C>
    where
        I: IntoIterator<Item = &'a C::Record>,
        C::Record: 'a,
    {
        let mut all_present = true;
        for record in records {
            if !self.remove(record)? {
                all_present = false;
            }
        }
        Ok(all_present)
    }

    /// Removes the records at `indices` and returns their keys.
    ///
    /// Indices refer to the order before the call. They are all validated
    /// first: one out-of-range index fails the call and nothing is removed.
    /// A repeated index yields its key twice but removes it once.
    pub fn remove_indices(&mut self, indices: &[usize]) -> SetResult<Vec<String>, C> {
        let len = self.entries.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(Error::out_of_range(index, len));
        }

        let keys: Vec<String> = indices
            .iter()
            .filter_map(|&index| self.entries.get_index(index))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            self.remove_key(key);
        }
        debug!(requested = indices.len(), remaining = self.len(), "removed records by index");
        Ok(keys)
    }

    /// Returns the record stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Arc<C::Record>> {
        self.entries.get(key)
    }

    /// Returns the record stored under `key`, or `default`.
    pub fn get_or(&self, key: &str, default: Arc<C::Record>) -> Arc<C::Record> {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    /// Strict keyed access.
    pub fn get_by_key(&self, key: &str) -> SetResult<&Arc<C::Record>, C> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Positional access in current insertion order.
    pub fn get_by_index(&self, index: usize) -> SetResult<&Arc<C::Record>, C> {
        self.entries
            .get_index(index)
            .map(|(_, record)| record)
            .ok_or_else(|| Error::out_of_range(index, self.entries.len()))
    }

    /// Looks a record up by key or by position.
    pub fn lookup<'a>(&self, locator: impl Into<Locator<'a>>) -> SetResult<&Arc<C::Record>, C> {
        match locator.into() {
            Locator::Key(key) => self.get_by_key(key),
            Locator::Index(index) => self.get_by_index(index),
        }
    }

    /// Removes and returns the record at `index`.
    ///
    /// Later records shift down by one. Breaks the seal.
    pub fn pop(&mut self, index: usize) -> SetResult<Arc<C::Record>, C> {
        let len = self.entries.len();
        let (_, record) = self
            .entries
            .shift_remove_index(index)
            .ok_or_else(|| Error::out_of_range(index, len))?;
        self.sealed = false;
        Ok(record)
    }

    /// Removes and returns the oldest record.
    pub fn pop_front(&mut self) -> SetResult<Arc<C::Record>, C> {
        self.pop(0)
    }

    /// Snapshot of the keys in current order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter_keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates `(key, record)` pairs in current order.
    pub fn iter_entries(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&str, &Arc<C::Record>)> + ExactSizeIterator {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Removes every record.
    ///
    /// Clearing an empty set keeps (or restores) the seal; clearing a
    /// non-empty set breaks it.
    pub fn clear(&mut self) {
        self.sealed = self.entries.is_empty();
        debug!(removed = self.entries.len(), "cleared canonical set");
        self.entries.clear();
    }

    /// Whether a member shares `record`'s canonical key.
    pub fn contains(&self, record: &C::Record) -> SetResult<bool, C> {
        let key = self.canonical_key(record)?;
        Ok(self.entries.contains_key(&key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether both sets hold exactly the same keys, in any order.
    ///
    /// Records, order, seal and chirality mode are not compared.
    pub fn equals<D: Canonicalizer>(&self, other: &CanonicalSet<D>) -> bool {
        self.len() == other.len() && self.entries.keys().all(|key| other.contains_key(key))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates records in current order.
    ///
    /// The iterator borrows the set, so the set cannot change mid-traversal.
    /// Each call starts again from the first record.
    pub fn iter(&self) -> Iter<'_, C::Record> {
        Iter {
            inner: self.entries.values(),
        }
    }

    /// Moves every key of `other` missing from `self` to the end of `self`.
    fn absorb(&mut self, other: &CanonicalSet<C>) -> usize {
        let mut appended = 0;
        for (key, record) in &other.entries {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), Arc::clone(record));
                appended += 1;
            }
        }
        if appended > 0 {
            self.sealed = false;
        }
        appended
    }

    /// Adds the records of `other` whose keys are not present yet.
    ///
    /// Appended records follow `other`'s order. Returns the number of
    /// appended records; the seal breaks only if it is non-zero.
    pub fn union_in_place(&mut self, other: &CanonicalSet<C>) -> usize {
        let appended = self.absorb(other);
        debug!(appended, len = self.len(), "merged canonical set in place");
        appended
    }
}

impl<C: Canonicalizer + Clone> CanonicalSet<C> {
    /// Copies the key map of `other`, sharing its records.
    ///
    /// The copy keeps `other`'s chirality mode and starts sealed.
    pub fn from_other(other: &CanonicalSet<C>) -> Self {
        Self::from_other_with_chirality(other, other.preserve_chirality)
    }

    /// Like [`from_other`](Self::from_other) with an explicit chirality mode.
    ///
    /// Existing keys are kept as computed by `other`; only records added
    /// later are keyed under the new mode.
    pub fn from_other_with_chirality(other: &CanonicalSet<C>, preserve_chirality: bool) -> Self {
        Self {
            canonicalizer: other.canonicalizer.clone(),
            entries: other.entries.clone(),
            preserve_chirality,
            sealed: true,
        }
    }

    /// Returns an independent, sealed copy sharing the same records.
    pub fn copy(&self) -> Self {
        Self::from_other(self)
    }

    /// Records of `self` followed by the records of `other` with new keys.
    ///
    /// Neither operand is modified. The result is sealed unless `other`
    /// contributed records.
    pub fn union(&self, other: &CanonicalSet<C>) -> Self {
        let mut merged = self.copy();
        let appended = merged.absorb(other);
        debug!(left = self.len(), appended, "computed union");
        merged
    }

    /// Records of `self` that are members of `other`, in `self`'s order.
    ///
    /// Membership is tested as by [`contains`](Self::contains) on `other`, so
    /// each record is canonicalized under `other`'s chirality mode. The result
    /// keeps `self`'s configuration and is sealed only when empty.
    pub fn intersection(&self, other: &CanonicalSet<C>) -> SetResult<Self, C> {
        let result = self.select(other, true)?;
        debug!(
            left = self.len(),
            right = other.len(),
            shared = result.len(),
            "computed intersection"
        );
        Ok(result)
    }

    /// Records of `self` that are not members of `other`, in `self`'s order.
    pub fn difference(&self, other: &CanonicalSet<C>) -> SetResult<Self, C> {
        let result = self.select(other, false)?;
        debug!(left = self.len(), right = other.len(), kept = result.len(), "computed difference");
        Ok(result)
    }

    fn select(&self, other: &CanonicalSet<C>, members: bool) -> SetResult<Self, C> {
        let mut result = Self::with_config(
            self.canonicalizer.clone(),
            SetConfig {
                preserve_chirality: self.preserve_chirality,
                sealed: true,
            },
        );
        for (key, record) in &self.entries {
            if other.contains(record)? == members {
                // Same canonicalizer and mode as `self`, so the stored key is the record's key.
                result.entries.insert(key.clone(), Arc::clone(record));
                result.sealed = false;
            }
        }
        Ok(result)
    }
}

impl<C: Canonicalizer> PartialEq for CanonicalSet<C> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<C: Canonicalizer> Eq for CanonicalSet<C> {}

impl<C: Canonicalizer> Index<usize> for CanonicalSet<C> {
    type Output = Arc<C::Record>;

    fn index(&self, index: usize) -> &Self::Output {
        match self.entries.get_index(index) {
            Some((_, record)) => record,
            None => panic!(
                "index out of range: the set holds {} records but the index is {index}",
                self.entries.len()
            ),
        }
    }
}

impl<C: Canonicalizer> Index<&str> for CanonicalSet<C> {
    type Output = Arc<C::Record>;

    fn index(&self, key: &str) -> &Self::Output {
        match self.entries.get(key) {
            Some(record) => record,
            None => panic!("no record with canonical key '{key}'"),
        }
    }
}

impl<C: Canonicalizer> fmt::Display for CanonicalSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "CanonicalSet (empty)");
        }
        write!(f, "CanonicalSet ({} records):", self.entries.len())?;
        for key in self.entries.keys() {
            write!(f, "\n> {key}")?;
        }
        Ok(())
    }
}

impl<C: Canonicalizer> fmt::Debug for CanonicalSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalSet")
            .field("preserve_chirality", &self.preserve_chirality)
            .field("sealed", &self.sealed)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Borrowing iterator over the records of a [`CanonicalSet`].
pub struct Iter<'a, R> {
    inner: indexmap::map::Values<'a, String, Arc<R>>,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a Arc<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<R> DoubleEndedIterator for Iter<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<R> ExactSizeIterator for Iter<'_, R> {}

impl<R> FusedIterator for Iter<'_, R> {}

/// Owning iterator over the records of a [`CanonicalSet`].
pub struct IntoIter<R> {
    inner: indexmap::map::IntoValues<String, Arc<R>>,
}

impl<R> Iterator for IntoIter<R> {
    type Item = Arc<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<R> DoubleEndedIterator for IntoIter<R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<R> ExactSizeIterator for IntoIter<R> {}

impl<R> FusedIterator for IntoIter<R> {}

impl<'a, C: Canonicalizer> IntoIterator for &'a CanonicalSet<C> {
    type Item = &'a Arc<C::Record>;
    type IntoIter = Iter<'a, C::Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C: Canonicalizer> IntoIterator for CanonicalSet<C> {
    type Item = Arc<C::Record>;
    type IntoIter = IntoIter<C::Record>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_values(),
        }
    }
}
