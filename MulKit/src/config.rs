//! Loader configuration
//!
//! Describes where a texture map archive lives. Every field has a default,
//! so an empty TOML document is a valid configuration:
//!
//! ```toml
//! data_dir = "/games/uo"
//! index_format = "classic"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mul::{
    IndexFormat, TEXMAPS_DEF_FILE, TEXMAPS_FILE, TEXMAPS_INDEX_COUNT, TEXMAPS_INDEX_FILE,
};
use crate::paths::DirectoryResolver;

/// File name looked up in the data directory when no config path is given
pub const CONFIG_FILE_NAME: &str = "mulkit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory holding the archive files
    pub data_dir: PathBuf,
    pub texmaps_file: String,
    pub index_file: String,
    /// Optional override definitions; a missing file is not an error
    pub definitions_file: String,
    /// Number of index records (and cache slots)
    pub entry_count: usize,
    pub index_format: IndexFormat,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            texmaps_file: TEXMAPS_FILE.to_string(),
            index_file: TEXMAPS_INDEX_FILE.to_string(),
            definitions_file: TEXMAPS_DEF_FILE.to_string(),
            entry_count: TEXMAPS_INDEX_COUNT,
            index_format: IndexFormat::Classic,
        }
    }
}

impl LoaderConfig {
    /// Default configuration rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if the file is missing, or
    /// [`Error::Config`] if it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Load `mulkit.toml` from `data_dir` if present, falling back to
    /// defaults rooted at `data_dir`.
    ///
    /// A relative `data_dir` inside the file is taken relative to the
    /// directory it was found in.
    pub fn discover(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Self::with_data_dir(data_dir);
        }

        match Self::from_file(&path) {
            Ok(mut config) => {
                if config.data_dir.is_relative() {
                    config.data_dir = data_dir.join(&config.data_dir);
                }
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::with_data_dir(data_dir)
            }
        }
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolver over [`Self::data_dir`]
    pub fn resolver(&self) -> DirectoryResolver {
        DirectoryResolver::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(LoaderConfig::from_toml_str("").unwrap(), LoaderConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = LoaderConfig::from_toml_str(
            "data_dir = \"/games/uo\"\nindex_format = \"extended\"\nentry_count = 16\n",
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/games/uo"));
        assert_eq!(config.index_format, IndexFormat::Extended);
        assert_eq!(config.entry_count, 16);
        assert_eq!(config.texmaps_file, "texmaps.mul");
    }

    #[test]
    fn test_malformed_document() {
        let err = LoaderConfig::from_toml_str("index_format = \"zip\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = LoaderConfig::with_data_dir("/tmp/uo");
        let text = config.to_toml_string().unwrap();
        assert_eq!(LoaderConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert_eq!(LoaderConfig::discover(temp.path()).data_dir, temp.path());

        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "data_dir = \"assets\"\ndefinitions_file = \"none.def\"\n",
        )
        .unwrap();
        let config = LoaderConfig::discover(temp.path());
        assert_eq!(config.data_dir, temp.path().join("assets"));
        assert_eq!(config.definitions_file, "none.def");

        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "entry_count = [").unwrap();
        assert_eq!(LoaderConfig::discover(temp.path()), LoaderConfig::with_data_dir(temp.path()));
    }
}
