use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Canonicalizer;
use crate::model::molecule::Molecule;
use crate::model::types::PropertyValue;

/// Errors raised when a molecule carries no usable key property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("molecule '{molecule}' has no '{property}' property to derive a canonical key from")]
    MissingProperty { property: String, molecule: String },

    #[error("property '{property}' of molecule '{molecule}' is a {kind}, not a key string")]
    UnsupportedValue {
        property: String,
        molecule: String,
        kind: &'static str,
    },

    #[error("property '{property}' of molecule '{molecule}' is empty")]
    Empty { property: String, molecule: String },
}

/// Keys molecules by a precomputed canonical identifier stored as a property.
///
/// Structure files produced by cheminformatics pipelines usually carry a
/// canonical SMILES or InChIKey data item. `PropertyKey` reads that item
/// instead of recomputing it. When chirality is ignored and an
/// `achiral_property` is configured, the stereo-free identifier is read
/// instead; otherwise the chiral property serves both modes.
///
/// # Examples
///
/// ```
/// use molset::{Canonicalizer, Molecule, PropertyKey};
///
/// let key = PropertyKey::new("SMILES").with_achiral("SMILES_FLAT");
/// let alanine = Molecule::named("L-alanine")
///     .with_property("SMILES", "C[C@H](N)C(=O)O")
///     .with_property("SMILES_FLAT", "CC(N)C(=O)O");
///
/// assert_eq!(key.canonicalize(&alanine, true).unwrap(), "C[C@H](N)C(=O)O");
/// assert_eq!(key.canonicalize(&alanine, false).unwrap(), "CC(N)C(=O)O");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyKey {
    pub chiral_property: String,
    #[serde(default)]
    pub achiral_property: Option<String>,
}

impl Default for PropertyKey {
    fn default() -> Self {
        Self::new("SMILES")
    }
}

impl PropertyKey {
    pub fn new(chiral_property: impl Into<String>) -> Self {
        Self {
            chiral_property: chiral_property.into(),
            achiral_property: None,
        }
    }

    pub fn with_achiral(mut self, achiral_property: impl Into<String>) -> Self {
        self.achiral_property = Some(achiral_property.into());
        self
    }

    /// The property consulted for the given chirality mode.
    pub fn property_for(&self, preserve_chirality: bool) -> &str {
        match (&self.achiral_property, preserve_chirality) {
            (Some(achiral), false) => achiral,
            _ => &self.chiral_property,
        }
    }
}

impl Canonicalizer for PropertyKey {
    type Record = Molecule;
    type Error = KeyError;

    fn canonicalize(&self, record: &Molecule, preserve_chirality: bool) -> Result<String, KeyError> {
        let property = self.property_for(preserve_chirality);
        let key = match record.property(property) {
            None => {
                return Err(KeyError::MissingProperty {
                    property: property.to_string(),
                    molecule: record.display_name().to_string(),
                });
            }
            Some(PropertyValue::Str(text)) => text.trim().to_string(),
            Some(PropertyValue::Int(id)) => id.to_string(),
            Some(other) => {
                return Err(KeyError::UnsupportedValue {
                    property: property.to_string(),
                    molecule: record.display_name().to_string(),
                    kind: other.kind(),
                });
            }
        };

        if key.is_empty() {
            return Err(KeyError::Empty {
                property: property.to_string(),
                molecule: record.display_name().to_string(),
            });
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_chiral_property_without_achiral_override() {
        let key = PropertyKey::new("SMILES");
        let mol = Molecule::new().with_property("SMILES", "C[C@@H](O)CC");
        assert_eq!(key.canonicalize(&mol, false).unwrap(), "C[C@@H](O)CC");
        assert_eq!(key.property_for(false), "SMILES");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let key = PropertyKey::new("InChIKey");
        let mol = Molecule::new().with_property("InChIKey", "  LFQSCWFLJHTTHZ-UHFFFAOYSA-N \n");
        assert_eq!(
            key.canonicalize(&mol, true).unwrap(),
            "LFQSCWFLJHTTHZ-UHFFFAOYSA-N"
        );
    }

    #[test]
    fn integer_identifiers_are_accepted() {
        let key = PropertyKey::new("compound_id");
        let mol = Molecule::new().with_property("compound_id", 2244);
        assert_eq!(key.canonicalize(&mol, true).unwrap(), "2244");
    }

    #[test]
    fn missing_property_names_the_molecule() {
        let key = PropertyKey::new("SMILES").with_achiral("FLAT");
        let err = key
            .canonicalize(&Molecule::named("caffeine"), false)
            .unwrap_err();
        assert_eq!(
            err,
            KeyError::MissingProperty {
                property: "FLAT".to_string(),
                molecule: "caffeine".to_string(),
            }
        );
        assert!(err.to_string().contains("caffeine"));
    }

    #[test]
    fn rejects_non_text_and_empty_values() {
        let key = PropertyKey::new("SMILES");
        let float = Molecule::new().with_property("SMILES", 1.25);
        assert!(matches!(
            key.canonicalize(&float, true),
            Err(KeyError::UnsupportedValue { kind: "float", .. })
        ));

        let blank = Molecule::new().with_property("SMILES", "   ");
        assert!(matches!(
            key.canonicalize(&blank, true),
            Err(KeyError::Empty { .. })
        ));
    }
}
