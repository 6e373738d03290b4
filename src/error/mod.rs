//! Error handling for the voting ledger
//!
//! This module provides the error types for all ledger operations.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations.
///
/// `InvalidArgument` covers malformed call shapes detected before any state
/// change; `Entry` covers content-level rule violations raised while
/// processing an entry. Validation boundaries (`Transaction::validate`,
/// `Block::is_block_valid`, `Chain::is_chain_valid`) convert both to a
/// boolean `false` and never let them propagate outward.
#[derive(Debug, Clone)]
pub enum LedgerError {
    /// Malformed call shape (wrong input count or wrong input type)
    InvalidArgument(String),
    /// Content-level rule violation while processing an entry
    Entry(String),
    /// A vote's answer is not a member of the elections' answer set
    AnswerNotFound(String),
    /// Cryptographic operation errors
    Crypto(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            LedgerError::Entry(msg) => write!(f, "Entry error: {msg}"),
            LedgerError::AnswerNotFound(msg) => write!(f, "Answer not found: {msg}"),
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
