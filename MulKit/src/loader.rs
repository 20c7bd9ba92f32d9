//! Texture map loader lifecycle
//!
//! `TexmapsLoader` is an ordinary owned value: the application constructs
//! it, starts the load, and tears it down. Loading runs on a background
//! thread and its progress is observed through [`LoadState`].
//!
//! ```no_run
//! use mulkit::loader::{LoadState, TexmapsLoader};
//! use mulkit::LoaderConfig;
//!
//! let mut loader = TexmapsLoader::new(LoaderConfig::with_data_dir("/games/uo"));
//! loader.load();
//!
//! // ... later, or from a frame loop via `poll()`
//! if *loader.wait() == LoadState::Ready {
//!     let tex = loader.get_texture(1, false);
//! }
//!
//! loader.clean_resources();
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::paths::PathResolver;
use crate::texmaps::Texmaps;
use crate::texture::Texture;

/// Where a loader is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Constructed or cleaned up; nothing is open
    Uninitialized,
    /// The background load is running
    Loading,
    /// Textures can be requested
    Ready,
    /// The last load failed; `load()` may be called again
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

type LoadTask = JoinHandle<Result<Texmaps>>;

/// Owns the texture map archive from load to teardown
pub struct TexmapsLoader {
    config: LoaderConfig,
    resolver: Arc<dyn PathResolver>,
    state: LoadState,
    task: Option<LoadTask>,
    texmaps: Option<Texmaps>,
}

impl TexmapsLoader {
    /// Loader resolving file names inside `config.data_dir`
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        let resolver = Arc::new(config.resolver());
        Self::with_resolver(config, resolver)
    }

    /// Loader using a caller-supplied path resolver
    #[must_use]
    pub fn with_resolver(config: LoaderConfig, resolver: Arc<dyn PathResolver>) -> Self {
        Self {
            config,
            resolver,
            state: LoadState::Uninitialized,
            task: None,
            texmaps: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    /// Start loading on a background thread.
    ///
    /// Returns `false` without doing anything if a load is already running
    /// or has completed successfully. A failed loader may be restarted.
    pub fn load(&mut self) -> bool {
        if matches!(self.state, LoadState::Loading | LoadState::Ready) {
            return false;
        }

        let config = self.config.clone();
        let resolver = Arc::clone(&self.resolver);
        let spawned = std::thread::Builder::new()
            .name("texmaps-load".to_string())
            .spawn(move || Texmaps::load(&config, resolver.as_ref()));

        match spawned {
            Ok(handle) => {
                self.task = Some(handle);
                self.state = LoadState::Loading;
                true
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                false
            }
        }
    }

    /// Load on the calling thread. Waits for a running background load
    /// instead of starting another one.
    pub fn load_blocking(&mut self) -> Result<()> {
        match self.state {
            LoadState::Ready => return Ok(()),
            LoadState::Loading => {
                self.wait();
                return if self.is_ready() {
                    Ok(())
                } else {
                    Err(Error::LoaderNotReady)
                };
            }
            LoadState::Uninitialized | LoadState::Failed(_) => {}
        }

        match Texmaps::load(&self.config, self.resolver.as_ref()) {
            Ok(texmaps) => {
                self.texmaps = Some(texmaps);
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Check a running load without blocking
    pub fn poll(&mut self) -> &LoadState {
        if self.task.as_ref().is_some_and(JoinHandle::is_finished) {
            self.finish();
        }
        &self.state
    }

    /// Block until a running load finishes
    pub fn wait(&mut self) -> &LoadState {
        if self.task.is_some() {
            self.finish();
        }
        &self.state
    }

    fn finish(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        self.state = match task.join() {
            Ok(Ok(texmaps)) => {
                self.texmaps = Some(texmaps);
                LoadState::Ready
            }
            Ok(Err(e)) => {
                tracing::debug!("Texmaps load failed: {e}");
                LoadState::Failed(e.to_string())
            }
            Err(_) => LoadState::Failed(Error::LoadTaskPanicked.to_string()),
        };
    }

    /// Texture for `index`, or `None` if the loader is not ready
    pub fn get_texture(&mut self, index: u32, keep_raw: bool) -> Option<Arc<Texture>> {
        self.texmaps.as_mut()?.get_texture(index, keep_raw)
    }

    pub fn texmaps(&self) -> Option<&Texmaps> {
        self.texmaps.as_ref()
    }

    pub fn texmaps_mut(&mut self) -> Option<&mut Texmaps> {
        self.texmaps.as_mut()
    }

    /// The loaded archive, or [`Error::LoaderNotReady`]
    pub fn require(&mut self) -> Result<&mut Texmaps> {
        self.texmaps.as_mut().ok_or(Error::LoaderNotReady)
    }

    /// Dispose every cached texture, close the archive and return to
    /// [`LoadState::Uninitialized`]. A running load is waited for first.
    ///
    /// Returns the number of textures disposed.
    pub fn clean_resources(&mut self) -> usize {
        self.wait();

        let disposed = self.texmaps.take().map_or(0, Texmaps::close);
        self.state = LoadState::Uninitialized;
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_archive_fails_load() {
        let temp = TempDir::new().unwrap();
        let mut loader = TexmapsLoader::new(LoaderConfig::with_data_dir(temp.path()));

        assert!(loader.load());
        assert!(!loader.load());
        assert!(matches!(loader.wait(), LoadState::Failed(msg) if msg.contains("texmaps.mul")));
        assert!(loader.get_texture(0, false).is_none());
        assert!(matches!(loader.require(), Err(Error::LoaderNotReady)));
    }

    #[test]
    fn test_blocking_load_error_is_returned() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("texmaps.mul"), [0u8; 8]).unwrap();
        let mut loader = TexmapsLoader::new(LoaderConfig::with_data_dir(temp.path()));

        let err = loader.load_blocking().unwrap_err();
        assert!(matches!(err, Error::FileNotFound { path } if path.ends_with("texidx.mul")));
        assert_eq!(loader.state().as_str(), "failed");
    }

    #[test]
    fn test_clean_uninitialized_is_noop() {
        let mut loader = TexmapsLoader::new(LoaderConfig::default());
        assert_eq!(loader.clean_resources(), 0);
        assert_eq!(loader.state(), &LoadState::Uninitialized);
    }
}
