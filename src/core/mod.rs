//! Core ledger functionality
//!
//! This module contains the fundamental components of the voting ledger:
//! entries and their variants, transactions with their UTXO bookkeeping,
//! blocks with proof-of-work sealing, the chain, and vote tallying.

pub mod block;
pub mod chain;
pub mod entry;
pub mod proof_of_work;
pub mod teller;
pub mod transaction;

pub use block::Block;
pub use chain::Chain;
pub use entry::{Elections, Entry, EntryKind, Tally, Vote};
pub use proof_of_work::{MiningOutcome, ProofOfWork};
pub use teller::{TallySummary, Teller, VotesTeller};
pub use transaction::{Transaction, TransactionInput, TransactionOutput};
