//! Key management and agent operations
//!
//! An [`Account`] pairs an ECDSA P-256 key pair with the ledger operations an
//! agent performs: calling elections, casting votes and tallying them. The
//! core only ever sees the [`PublicKey`] side of an account.

pub mod account;

pub use account::{Account, PublicKey};
