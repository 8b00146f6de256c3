//! Target definition loading from TOML files.
//!
//! This module handles loading target definitions from the
//! `target-definitions/` directory, with a bundled fallback definition
//! compiled into the crate.

use crate::definition::TargetDefinition;
use crate::error::{Result, SuiteError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The definition shipped with the harness.
const BUNDLED_MARQUEE: &str = include_str!("../../../target-definitions/marquee.toml");

/// Parse the bundled Marquee definition.
pub fn bundled_definition() -> Result<TargetDefinition> {
    let definition: TargetDefinition =
        toml::from_str(BUNDLED_MARQUEE).map_err(|source| SuiteError::ParseError {
            path: "<bundled marquee.toml>".to_string(),
            source,
        })?;
    definition.validate()?;
    Ok(definition)
}

/// Loader for target definitions from TOML files.
pub struct TargetLoader {
    /// Base directory containing target definitions
    definitions_dir: PathBuf,
}

impl TargetLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(SuiteError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Create a loader using the default definitions directory.
    ///
    /// Looks for `target-definitions/` relative to the workspace root.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        // Find workspace root by looking for Cargo.toml with [workspace]
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        let definitions_dir = current_dir.join("target-definitions");
                        return Self::new(definitions_dir);
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        // Fallback: try relative path
        Self::new(PathBuf::from("target-definitions"))
    }

    /// Load and validate a single definition file.
    pub fn load_file(&self, path: &Path) -> Result<TargetDefinition> {
        let contents = std::fs::read_to_string(path)?;
        let definition: TargetDefinition =
            toml::from_str(&contents).map_err(|source| SuiteError::ParseError {
                path: path.display().to_string(),
                source,
            })?;

        definition.validate()?;

        debug!(
            target_id = %definition.id(),
            path = %path.display(),
            "loaded target definition"
        );

        Ok(definition)
    }

    /// Load all target definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<TargetDefinition>> {
        let mut definitions = Vec::new();

        for entry in std::fs::read_dir(&self.definitions_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            match self.load_file(&path) {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping invalid target definition");
                }
            }
        }

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded target definitions"
        );

        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_definition_parses() {
        let def = bundled_definition().expect("bundled definition");
        assert_eq!(def.id().as_str(), "marquee");
    }

    #[test]
    fn test_loader_missing_dir() {
        let result = TargetLoader::new("/no/such/dir");
        assert!(matches!(result, Err(SuiteError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_load_file_and_load_all() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("marquee.toml");
        fs::write(&path, BUNDLED_MARQUEE).expect("write definition");

        // A broken file should be skipped by load_all, not fail it
        fs::write(tmp.path().join("broken.toml"), "not = [valid").expect("write broken");
        // Non-TOML files are ignored entirely
        fs::write(tmp.path().join("notes.txt"), "ignore me").expect("write notes");

        let loader = TargetLoader::new(tmp.path()).expect("loader");

        let single = loader.load_file(&path).expect("load single");
        assert_eq!(single.id().as_str(), "marquee");

        let all = loader.load_all().expect("load all");
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_load_file_invalid_toml() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[target]\nid = 42").expect("write bad definition");

        let loader = TargetLoader::new(tmp.path()).expect("loader");
        assert!(matches!(
            loader.load_file(&path),
            Err(SuiteError::ParseError { .. })
        ));
    }
}
