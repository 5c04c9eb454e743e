use std::ops::{Add, AddAssign, BitAnd, Sub};

use super::{CanonicalSet, Error};
use crate::canon::Canonicalizer;

impl<C: Canonicalizer + Clone> Add<&CanonicalSet<C>> for &CanonicalSet<C> {
    type Output = CanonicalSet<C>;

    fn add(self, rhs: &CanonicalSet<C>) -> CanonicalSet<C> {
        self.union(rhs)
    }
}

impl<C: Canonicalizer> AddAssign<&CanonicalSet<C>> for CanonicalSet<C> {
    fn add_assign(&mut self, rhs: &CanonicalSet<C>) {
        self.union_in_place(rhs);
    }
}

/// Fallible: membership in `rhs` canonicalizes each record of `self`.
impl<C: Canonicalizer + Clone> BitAnd<&CanonicalSet<C>> for &CanonicalSet<C> {
    type Output = Result<CanonicalSet<C>, Error<C::Error>>;

    fn bitand(self, rhs: &CanonicalSet<C>) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<C: Canonicalizer + Clone> Sub<&CanonicalSet<C>> for &CanonicalSet<C> {
    type Output = Result<CanonicalSet<C>, Error<C::Error>>;

    fn sub(self, rhs: &CanonicalSet<C>) -> Self::Output {
        self.difference(rhs)
    }
}
