//! Error Types
//!
//! One enum per concern. None of these abort a session: codec and
//! storage errors degrade to an empty or default state at the call site.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Board-level errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Tier not found: {0}")]
    TierNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Catalog package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid base origin: {0}")]
    InvalidBaseOrigin(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Why a URL token could not be turned back into a board
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Token is empty")]
    EmptyToken,

    #[error("Token is {len} bytes, limit is {max}")]
    TokenTooLong { len: usize, max: usize },

    #[error("Decompression failed: {0}")]
    Decompress(#[from] LzError),

    #[error("Token payload is not a board: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token holds no tiers")]
    EmptyBoard,
}

/// Failures of the URI-safe LZ transform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LzError {
    #[error("Character {0:?} is outside the URI-safe alphabet")]
    InvalidCharacter(char),

    #[error("Stream ended before the end marker")]
    Truncated,

    #[error("Stream references an unknown dictionary entry")]
    Corrupt,

    #[error("Decompressed text is not valid UTF-16")]
    InvalidUtf16,

    #[error("Decompressed text exceeds {0} code units")]
    TooLarge(usize),
}

/// Local key-value store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}

/// Bundled catalog document could not be read
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog {catalog} has an entry with an empty filename")]
    EmptyFilename { catalog: String },
}
