//! Resolution of named asset files to paths on disk

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Maps an asset file name (e.g. `texmaps.mul`) to a path
pub trait PathResolver: Send + Sync {
    fn resolve(&self, name: &str) -> PathBuf;
}

/// Resolves names inside a single directory
///
/// An exact match wins. Otherwise the directory is scanned for a file whose
/// name matches ignoring ASCII case, since asset folders copied from Windows
/// installs mix `TexIdx.mul` and `texidx.mul`. If nothing matches, the exact
/// path is returned so callers can report it as missing.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for DirectoryResolver {
    fn resolve(&self, name: &str) -> PathBuf {
        let exact = self.root.join(name);
        if exact.exists() {
            return exact;
        }

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_string_lossy().eq_ignore_ascii_case(name)
            })
            .map_or(exact, walkdir::DirEntry::into_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exact_match() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("texmaps.mul"), b"").unwrap();

        let resolver = DirectoryResolver::new(temp.path());
        assert_eq!(resolver.resolve("texmaps.mul"), temp.path().join("texmaps.mul"));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("TexIdx.MUL"), b"").unwrap();

        let resolver = DirectoryResolver::new(temp.path());
        let resolved = resolver.resolve("texidx.mul");
        assert!(resolved.is_file());
        assert_eq!(resolved.parent(), Some(temp.path()));
    }

    #[test]
    fn test_missing_returns_exact_path() {
        let temp = TempDir::new().unwrap();
        let resolver = DirectoryResolver::new(temp.path());
        assert_eq!(resolver.resolve("TexTerr.def"), temp.path().join("TexTerr.def"));
    }
}
