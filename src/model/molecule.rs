use indexmap::IndexMap;

use super::atom::Atom;
use super::types::{BondOrder, PropertyValue};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        Self {
            i: idx1.min(idx2),
            j: idx1.max(idx2),
            order,
        }
    }
}

/// A single molecular record: connection table plus named scalar properties.
///
/// Properties keep their insertion order so that files written back out list
/// data items in the order they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub name: Option<String>,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub properties: IndexMap<String, PropertyValue>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// The record name, or `<unnamed>` for diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Sets a property, keeping its position if it already exists.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(name)
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(name, value);
        self
    }
}
