//! Utility functions and helpers
//!
//! This module contains the cryptographic utilities used throughout the
//! ledger: SHA-256 hex digests, ECDSA P-256 signing and verification, and
//! canonical timestamps.

pub mod crypto;

pub use crypto::{
    current_timestamp, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify, hash_string,
    new_key_pair, public_key_from_pkcs8, sha256_digest,
};
