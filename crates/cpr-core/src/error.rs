//! Error types for the cpr-core library.
//!
//! Errors are layered the same way the reader is: a [`TokenError`] describes a
//! failed length-prefixed read, an [`ExtractError`] names the record field that
//! could not be read, and [`Error`] is what a whole parse returns.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cpr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to read a single length-prefixed token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The length byte lies past the end of the buffer
    #[error("the length byte at offset {offset} goes beyond the end of the project")]
    LengthBeyondEnd {
        /// Offset of the missing length byte
        offset: usize,
    },

    /// The token body would run past the end of the buffer
    #[error("the token of {length} bytes at offset {offset} goes beyond the end of the project")]
    TokenBeyondEnd {
        /// Offset of the token's length byte
        offset: usize,
        /// Declared token length
        length: usize,
    },

    /// The token has no NUL terminator and the strict policy is in effect
    #[error("the token at offset {offset} has no nul terminator")]
    TokenNulMissing {
        /// Offset of the token's length byte
        offset: usize,
    },
}

/// A marker matched but the record following it could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Application name token unreadable
    #[error("unable to obtain the application name at offset {offset}")]
    NoApplication {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },

    /// Application version token unreadable
    #[error("unable to obtain the application version at offset {offset}")]
    NoVersion {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },

    /// Release date token unreadable
    #[error("unable to obtain the application release date at offset {offset}")]
    NoReleaseDate {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },

    /// Plugin GUID token unreadable
    #[error("unable to obtain a plugin GUID at offset {offset}")]
    NoPluginGuid {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },

    /// Plugin name key or value unreadable, or the key is not `Plugin Name`
    #[error("unable to obtain a plugin name at offset {offset}")]
    NoPluginName {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure, absent when the key text mismatched
        #[source]
        source: Option<TokenError>,
    },

    /// The key following the plugin name is unreadable
    #[error("unable to obtain the token after a plugin name at offset {offset}")]
    NoTokenAfterPluginName {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },

    /// The `Original Plugin Name` value is unreadable
    #[error("unable to obtain an original plugin name at offset {offset}")]
    NoOriginalPluginName {
        /// Offset of the attempted read
        offset: usize,
        /// Underlying token failure
        #[source]
        source: TokenError,
    },
}

/// Error type for all cpr operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A record marker matched but its fields were malformed
    #[error("the project is corrupted: {0}")]
    Corrupted(#[from] ExtractError),

    /// The whole buffer was scanned without finding application metadata
    #[error("the project has no metadata and appears to be corrupt")]
    CorruptProject,
}

/// Flat classification of every failure a parse can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`TokenError::LengthBeyondEnd`]
    LengthBeyondEnd,
    /// See [`TokenError::TokenBeyondEnd`]
    TokenBeyondEnd,
    /// See [`TokenError::TokenNulMissing`]
    TokenNulMissing,
    /// See [`ExtractError::NoApplication`]
    NoApplication,
    /// See [`ExtractError::NoVersion`]
    NoVersion,
    /// See [`ExtractError::NoReleaseDate`]
    NoReleaseDate,
    /// See [`ExtractError::NoPluginGuid`]
    NoPluginGuid,
    /// See [`ExtractError::NoPluginName`]
    NoPluginName,
    /// See [`ExtractError::NoTokenAfterPluginName`]
    NoTokenAfterPluginName,
    /// See [`ExtractError::NoOriginalPluginName`]
    NoOriginalPluginName,
    /// See [`Error::CorruptProject`]
    CorruptProject,
    /// See [`Error::FileRead`]
    FileRead,
}

impl TokenError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthBeyondEnd { .. } => ErrorKind::LengthBeyondEnd,
            Self::TokenBeyondEnd { .. } => ErrorKind::TokenBeyondEnd,
            Self::TokenNulMissing { .. } => ErrorKind::TokenNulMissing,
        }
    }
}

impl ExtractError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoApplication { .. } => ErrorKind::NoApplication,
            Self::NoVersion { .. } => ErrorKind::NoVersion,
            Self::NoReleaseDate { .. } => ErrorKind::NoReleaseDate,
            Self::NoPluginGuid { .. } => ErrorKind::NoPluginGuid,
            Self::NoPluginName { .. } => ErrorKind::NoPluginName,
            Self::NoTokenAfterPluginName { .. } => ErrorKind::NoTokenAfterPluginName,
            Self::NoOriginalPluginName { .. } => ErrorKind::NoOriginalPluginName,
        }
    }

    /// Offset of the read that failed
    pub fn offset(&self) -> usize {
        match self {
            Self::NoApplication { offset, .. }
            | Self::NoVersion { offset, .. }
            | Self::NoReleaseDate { offset, .. }
            | Self::NoPluginGuid { offset, .. }
            | Self::NoPluginName { offset, .. }
            | Self::NoTokenAfterPluginName { offset, .. }
            | Self::NoOriginalPluginName { offset, .. } => *offset,
        }
    }
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Returns the most specific kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileRead { .. } => ErrorKind::FileRead,
            Self::Corrupted(e) => e.kind(),
            Self::CorruptProject => ErrorKind::CorruptProject,
        }
    }
}
