//! Error types for the search crate.
//!
//! Searching itself never fails; these errors come from building or loading
//! a matcher configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while configuring a matcher.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration values failed validation
    #[error("Invalid matcher config: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the schema
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be rendered back to TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A keyword produced a pattern the regex engine rejected
    #[error("Invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Error code for integration with HostelBazaar error reporting.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Configuration values failed validation
    InvalidConfig = 11001,
    /// Configuration file could not be read
    ConfigRead = 11002,
    /// Configuration file could not be parsed
    ConfigParse = 11003,
    /// Configuration could not be serialized
    ConfigSerialize = 11004,
    /// Keyword pattern rejected
    InvalidPattern = 11005,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidConfig(_) => SearchErrorCode::InvalidConfig,
            SearchError::ConfigRead { .. } => SearchErrorCode::ConfigRead,
            SearchError::ConfigParse { .. } => SearchErrorCode::ConfigParse,
            SearchError::ConfigSerialize(_) => SearchErrorCode::ConfigSerialize,
            SearchError::InvalidPattern(_) => SearchErrorCode::InvalidPattern,
        }
    }
}
