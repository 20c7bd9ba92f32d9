//! Error types for `MulKit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `MulKit` operations.
///
/// Out-of-range indices never surface here: the entry table, the override
/// resolver and the texture cache all skip or clamp them instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required archive file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The path that was expected to exist.
        path: PathBuf,
    },

    /// Unexpected end of file while reading a fixed-width value.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Attempted to seek past the end of the data file.
    #[error("seek offset {offset} is beyond data length {len}")]
    SeekOutOfRange {
        /// The requested offset.
        offset: u64,
        /// The length of the data file.
        len: u64,
    },

    // ==================== Configuration Errors ====================
    /// The loader configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    // ==================== Texture Errors ====================
    /// Failed to create an image buffer from texture data.
    #[error("failed to create image buffer")]
    ImageBufferFailed,

    /// Failed to encode PNG image.
    #[error("failed to encode PNG: {message}")]
    PngEncode {
        /// The encoding error message.
        message: String,
    },

    // ==================== Lifecycle Errors ====================
    /// The loader has not finished loading (or its load failed).
    #[error("loader is not ready")]
    LoaderNotReady,

    /// The background load thread panicked.
    #[error("load task panicked")]
    LoadTaskPanicked,
}

impl Error {
    /// Map an IO error, folding `UnexpectedEof` into [`Error::UnexpectedEof`].
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// A specialized Result type for `MulKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
