//! Lookup of auxiliary data files in an explicitly configured directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFileError {
    #[error("the file '{name}' does not exist in the data directory '{}'", dir.display())]
    NotFound { name: String, dir: PathBuf },
}

/// A base directory holding reference data files.
///
/// The directory is passed in by the caller (configuration file, command
/// line) rather than discovered from a global location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    base: PathBuf,
}

impl DataDir {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Returns the full path of `name` inside the directory.
    ///
    /// Fails if no such file exists.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, DataFileError> {
        let full = self.base.join(name);
        if full.is_file() {
            Ok(full)
        } else {
            Err(DataFileError::NotFound {
                name: name.to_string(),
                dir: self.base.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("actives.sdf"), "").unwrap();

        let data = DataDir::new(dir.path());
        assert_eq!(
            data.resolve("actives.sdf").unwrap(),
            dir.path().join("actives.sdf")
        );
    }

    #[test]
    fn missing_files_report_name_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());

        let err = data.resolve("decoys.sdf").unwrap_err();
        assert_eq!(
            err,
            DataFileError::NotFound {
                name: "decoys.sdf".to_string(),
                dir: dir.path().to_path_buf(),
            }
        );
        assert!(err.to_string().contains("decoys.sdf"));
    }

    #[test]
    fn directories_are_not_data_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        assert!(DataDir::new(dir.path()).resolve("nested").is_err());
    }
}
