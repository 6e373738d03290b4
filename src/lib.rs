//! # Ballotchain - a minimal e-voting ledger
//!
//! A hash-linked chain of blocks carrying three kinds of domain events -
//! calling elections, casting a vote, and tallying results - as ECDSA-signed
//! transactions with an unspent-output consumption model.
//!
//! ## How the code is organized
//! - `core/`: the heart of the ledger (entries, transactions, blocks,
//!   proof-of-work mining, the chain, vote tallying)
//! - `account/`: ECDSA key management and the agent-level operations
//! - `config/`: block version and mining difficulty settings
//! - `utils/`: SHA-256 hex digests and ECDSA signing helpers
//!
//! ## Key design decisions
//! - Entries are a closed sum type dispatched by pattern matching; an
//!   entry's id is an `Option` that stays empty until processing succeeds
//! - Pool membership matches on surrogate output ids, never on object
//!   identity
//! - Every hash preimage is canonical UTF-8 text (millisecond timestamps,
//!   bracketed comma-space lists), so identifiers reproduce byte for byte
//!   across processes
//! - Validation boundaries return booleans and never raise; only entry
//!   processing and construction paths surface errors, and only before any
//!   observable state change
//!
//! The ledger is a single-process data structure: no networking, no
//! persistence, no multi-node consensus. The only unbounded operation is
//! proof-of-work mining, which is exposed as a cancellable, resumable
//! search.

pub mod account;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

// Re-export commonly used types for convenience
pub use account::{Account, PublicKey};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, Chain, Elections, Entry, EntryKind, MiningOutcome, ProofOfWork, Tally, TallySummary,
    Teller, Transaction, TransactionInput, TransactionOutput, Vote, VotesTeller,
};
pub use error::{LedgerError, Result};
pub use utils::{
    current_timestamp, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify, hash_string,
    new_key_pair, public_key_from_pkcs8, sha256_digest,
};
