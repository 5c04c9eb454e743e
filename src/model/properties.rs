//! Record-level metadata transfer between molecules.
//!
//! [`copy_properties`] moves scalar properties from one [`Molecule`] onto
//! another, for example when a transformed structure must carry the
//! annotations of the record it was derived from. Properties whose name
//! contains [`TEMPORARY_MARKER`] are bookkeeping values of a processing step
//! and never travel.

use serde::{Deserialize, Serialize};

use super::molecule::Molecule;

/// Substring marking a property as scratch data that must not be copied.
pub const TEMPORARY_MARKER: &str = "_molset_tmp_";

/// Controls which properties [`copy_properties`] transfers.
///
/// # Examples
///
/// ```
/// use molset::CopyOptions;
///
/// let options = CopyOptions {
///     exclude: vec!["docking_score".to_string()],
///     ..Default::default()
/// };
/// assert!(options.include_name);
/// assert!(!options.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    /// Drop destination properties that the source does not carry.
    pub strict: bool,
    /// Copy the record name as well.
    pub include_name: bool,
    /// Property names that are never copied.
    pub exclude: Vec<String>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            strict: false,
            include_name: true,
            exclude: Vec::new(),
        }
    }
}

impl CopyOptions {
    fn skips(&self, name: &str) -> bool {
        name.contains(TEMPORARY_MARKER) || self.exclude.iter().any(|e| e == name)
    }
}

/// Copies the scalar properties of `source` onto `dest`.
///
/// Existing destination values with the same name are overwritten. Returns
/// the number of properties copied (the name is not counted).
pub fn copy_properties(source: &Molecule, dest: &mut Molecule, options: &CopyOptions) -> usize {
    if options.strict {
        dest.properties
            .retain(|name, _| source.properties.contains_key(name));
    }

    let mut copied = 0;
    for (name, value) in &source.properties {
        if options.skips(name) {
            continue;
        }
        dest.properties.insert(name.clone(), value.clone());
        copied += 1;
    }

    if options.include_name
        && let Some(name) = &source.name
    {
        dest.name = Some(name.clone());
    }

    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::PropertyValue;

    fn source() -> Molecule {
        Molecule::named("histidine")
            .with_property("SMILES", "NC(Cc1c[nH]cn1)C(=O)O")
            .with_property("pKa", 6.0)
            .with_property("_molset_tmp_isomer_id", 7)
            .with_property("docking_score", -8.2)
    }

    #[test]
    fn copies_everything_but_temporary_properties() {
        let mut dest = Molecule::named("scratch");
        let copied = copy_properties(&source(), &mut dest, &CopyOptions::default());

        assert_eq!(copied, 3);
        assert_eq!(dest.name.as_deref(), Some("histidine"));
        assert!(dest.has_property("SMILES"));
        assert!(dest.has_property("docking_score"));
        assert!(!dest.has_property("_molset_tmp_isomer_id"));
    }

    #[test]
    fn honours_exclusions_and_name_flag() {
        let mut dest = Molecule::named("keep-me");
        let options = CopyOptions {
            include_name: false,
            exclude: vec!["docking_score".to_string()],
            ..Default::default()
        };
        let copied = copy_properties(&source(), &mut dest, &options);

        assert_eq!(copied, 2);
        assert_eq!(dest.name.as_deref(), Some("keep-me"));
        assert!(!dest.has_property("docking_score"));
    }

    #[test]
    fn strict_mode_drops_destination_only_properties() {
        let mut dest = Molecule::new()
            .with_property("stale", true)
            .with_property("pKa", 1.0);
        copy_properties(&source(), &mut dest, &CopyOptions {
            strict: true,
            ..Default::default()
        });

        assert!(!dest.has_property("stale"));
        assert_eq!(dest.property("pKa"), Some(&PropertyValue::Double(6.0)));
    }

    #[test]
    fn lenient_mode_keeps_destination_only_properties() {
        let mut dest = Molecule::new().with_property("stale", true);
        copy_properties(&source(), &mut dest, &CopyOptions::default());
        assert!(dest.has_property("stale"));
    }

    #[test]
    fn unnamed_source_leaves_destination_name() {
        let mut dest = Molecule::named("target");
        copy_properties(&Molecule::new(), &mut dest, &CopyOptions::default());
        assert_eq!(dest.name.as_deref(), Some("target"));
    }
}
