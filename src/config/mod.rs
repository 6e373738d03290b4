//! Configuration management
//!
//! This module handles the basic ledger settings: the block version tag and
//! the default proof-of-work mining difficulty.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
