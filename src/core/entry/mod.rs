//! The domain payloads carried inside transactions
//!
//! An [`Entry`] is one of three events: calling elections, casting a vote in
//! them, or tallying their votes. Each variant owns its processing and
//! validation rules; the enum dispatches to them by pattern matching.
//!
//! An entry's id is absent until `process_entry` succeeds. Once set it only
//! changes through another successful `process_entry` call;
//! `validate_entry` recomputes the id from the current fields and compares.

pub mod elections;
pub mod tally;
pub mod vote;

pub use elections::Elections;
pub use tally::Tally;
pub use vote::Vote;

use crate::account::PublicKey;
use crate::core::transaction::{TransactionInput, TransactionOutput};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of entry variants, used to filter pool outputs by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Elections,
    Vote,
    Tally,
}

/// The data stored in a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entry {
    Elections(Elections),
    Vote(Vote),
    Tally(Tally),
}

impl Entry {
    /// Processes this entry against its transaction's inputs.
    ///
    /// Sets the entry id on success and returns the outputs the entry itself
    /// produces. Raises `InvalidArgument` when the input shape contract is
    /// violated and `Entry` when a content-level precondition fails; the id
    /// stays unchanged on failure.
    pub fn process_entry(
        &mut self,
        inputs: Option<&[TransactionInput]>,
    ) -> Result<Vec<TransactionOutput>> {
        match self {
            Entry::Elections(elections) => elections.process_entry(inputs),
            Entry::Vote(vote) => vote.process_entry(inputs),
            Entry::Tally(tally) => tally.process_entry(inputs),
        }
    }

    /// Recomputes the id from the current fields and compares it against the
    /// stored one. False when the entry was never processed.
    pub fn validate_entry(&self) -> bool {
        match self {
            Entry::Elections(elections) => elections.validate_entry(),
            Entry::Vote(vote) => vote.validate_entry(),
            Entry::Tally(tally) => tally.validate_entry(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Entry::Elections(elections) => elections.id(),
            Entry::Vote(vote) => vote.id(),
            Entry::Tally(tally) => tally.id(),
        }
    }

    pub fn author(&self) -> &PublicKey {
        match self {
            Entry::Elections(elections) => elections.caller(),
            Entry::Vote(vote) => vote.voter(),
            Entry::Tally(tally) => tally.teller(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Entry::Elections(elections) => elections.timestamp(),
            Entry::Vote(vote) => vote.timestamp(),
            Entry::Tally(tally) => tally.timestamp(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Elections(_) => EntryKind::Elections,
            Entry::Vote(_) => EntryKind::Vote,
            Entry::Tally(_) => EntryKind::Tally,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Elections(elections) => elections.fmt(f),
            Entry::Vote(vote) => vote.fmt(f),
            Entry::Tally(tally) => tally.fmt(f),
        }
    }
}

/// Canonical text form of a list: the comma-space join of each element's
/// display form inside brackets. Part of the hash preimage format and must
/// not change.
pub(crate) fn list_text<T: fmt::Display>(items: &[T]) -> String {
    let joined = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(", ");
    format!("[{joined}]")
}
