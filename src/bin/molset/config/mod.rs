use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use molset::{CopyOptions, DataDir, PropertyKey, SetConfig};

use crate::cli::{KeyOptions, MergeOptions};

/// Contents of a `molset` TOML configuration file.
///
/// ```toml
/// data_dir = "/srv/libraries"
///
/// [key]
/// property = "InChIKey"
/// achiral_property = "InChIKey_FLAT"
/// preserve_chirality = true
///
/// [merge]
/// enabled = true
/// strict = false
/// exclude = ["docking_score"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub key: KeySection,
    pub merge: MergeSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeySection {
    pub property: Option<String>,
    pub achiral_property: Option<String>,
    pub preserve_chirality: bool,
}

impl Default for KeySection {
    fn default() -> Self {
        Self {
            property: None,
            achiral_property: None,
            preserve_chirality: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MergeSection {
    pub enabled: bool,
    pub strict: bool,
    pub include_name: bool,
    pub exclude: Vec<String>,
}

impl MergeSection {
    fn into_options(self) -> CopyOptions {
        CopyOptions {
            strict: self.strict,
            include_name: self.include_name,
            exclude: self.exclude,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Effective settings after command-line flags are applied over the file.
#[derive(Debug)]
pub struct Settings {
    pub key: PropertyKey,
    pub set: SetConfig,
    pub merge: Option<CopyOptions>,
    pub data_dir: Option<DataDir>,
}

impl Settings {
    pub fn load(
        config: Option<&Path>,
        key: &KeyOptions,
        merge: Option<&MergeOptions>,
    ) -> Result<Self> {
        let file = match config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, key, merge))
    }

    pub fn resolve(file: FileConfig, key: &KeyOptions, merge: Option<&MergeOptions>) -> Self {
        let property = key
            .property
            .clone()
            .or(file.key.property)
            .unwrap_or_else(|| PropertyKey::default().chiral_property);
        let mut canonicalizer = PropertyKey::new(property);
        if let Some(achiral) = key.achiral_property.clone().or(file.key.achiral_property) {
            canonicalizer = canonicalizer.with_achiral(achiral);
        }

        let set = SetConfig {
            preserve_chirality: file.key.preserve_chirality && !key.ignore_chirality,
            ..SetConfig::default()
        };

        let merge = merge.and_then(|cli| {
            if !cli.enabled && !file.merge.enabled {
                return None;
            }
            let mut options = file.merge.into_options();
            options.strict |= cli.strict;
            options.exclude.extend(cli.exclude.iter().cloned());
            Some(options)
        });

        Self {
            key: canonicalizer,
            set,
            merge,
            data_dir: file.data_dir.map(DataDir::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_opts() -> KeyOptions {
        KeyOptions {
            property: None,
            achiral_property: None,
            ignore_chirality: false,
        }
    }

    fn merge_opts(enabled: bool) -> MergeOptions {
        MergeOptions {
            enabled,
            strict: false,
            exclude: Vec::new(),
        }
    }

    #[test]
    fn defaults_key_on_smiles_and_keep_chirality() {
        let settings = Settings::resolve(FileConfig::default(), &key_opts(), None);
        assert_eq!(settings.key, PropertyKey::default());
        assert!(settings.set.preserve_chirality);
        assert!(settings.merge.is_none());
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn file_values_are_read() {
        let file = FileConfig::parse(
            r#"
            data_dir = "/srv/libraries"

            [key]
            property = "InChIKey"
            achiral_property = "InChIKey_FLAT"
            preserve_chirality = false

            [merge]
            enabled = true
            exclude = ["docking_score"]
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(file, &key_opts(), Some(&merge_opts(false)));
        assert_eq!(settings.key.chiral_property, "InChIKey");
        assert_eq!(settings.key.achiral_property.as_deref(), Some("InChIKey_FLAT"));
        assert!(!settings.set.preserve_chirality);

        let merge = settings.merge.unwrap();
        assert_eq!(merge.exclude, vec!["docking_score"]);
        assert!(!merge.include_name);
        assert_eq!(
            settings.data_dir.unwrap().path(),
            Path::new("/srv/libraries")
        );
    }

    #[test]
    fn command_line_overrides_file() {
        let file = FileConfig::parse("[key]\nproperty = \"InChIKey\"\n").unwrap();
        let key = KeyOptions {
            property: Some("CANONICAL_SMILES".to_string()),
            achiral_property: None,
            ignore_chirality: true,
        };
        let merge = MergeOptions {
            enabled: true,
            strict: true,
            exclude: vec!["score".to_string()],
        };

        let settings = Settings::resolve(file, &key, Some(&merge));
        assert_eq!(settings.key.chiral_property, "CANONICAL_SMILES");
        assert!(!settings.set.preserve_chirality);
        let merge = settings.merge.unwrap();
        assert!(merge.strict);
        assert_eq!(merge.exclude, vec!["score"]);
    }

    #[test]
    fn malformed_files_are_rejected() {
        assert!(FileConfig::parse("[key]\nproperty = 3\n").is_err());
    }
}
