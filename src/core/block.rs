use crate::account::PublicKey;
use crate::config::GLOBAL_CONFIG;
use crate::core::entry::{list_text, EntryKind};
use crate::core::proof_of_work::{MiningOutcome, ProofOfWork};
use crate::core::transaction::{Transaction, TransactionOutput};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::AtomicBool;

/// A single block in the ledger.
///
/// A block is a one-way state machine: *open* while its hash is empty,
/// *sealed* once `mine_hash` finds a proof-of-work hash. While open it
/// accepts transactions, maintaining the live pool of unconsumed outputs
/// seeded at construction, and queues unsigned transactions until their
/// signatures arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Deterministic id computed from the header at construction.
    id: String,
    /// The mined hash; empty until `mine_hash` seals this block.
    hash: String,
    previous_hash: String,
    transactions: Vec<Transaction>,
    timestamp: i64,
    nonce: u64,
    block_version: String,
    /// The number of leading zero characters required in the mined hash.
    mining_difficulty: usize,
    /// Outputs not yet consumed by any accepted transaction.
    unconsumed_outputs: Vec<TransactionOutput>,
    /// Transactions waiting for their signer to countersign.
    unsigned_transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        previous_hash: impl Into<String>,
        block_version: impl Into<String>,
        mining_difficulty: usize,
        unconsumed_outputs: Vec<TransactionOutput>,
    ) -> Block {
        Block::with_unsigned_transactions(
            previous_hash,
            block_version,
            mining_difficulty,
            unconsumed_outputs,
            Vec::new(),
        )
    }

    pub fn with_unsigned_transactions(
        previous_hash: impl Into<String>,
        block_version: impl Into<String>,
        mining_difficulty: usize,
        unconsumed_outputs: Vec<TransactionOutput>,
        unsigned_transactions: Vec<Transaction>,
    ) -> Block {
        let timestamp = crate::utils::current_timestamp();
        let previous_hash = previous_hash.into();
        let block_version = block_version.into();
        let id = crate::utils::hash_string(&format!(
            "{timestamp}{block_version}{previous_hash}"
        ));
        Block {
            id,
            hash: String::new(),
            previous_hash,
            transactions: Vec::new(),
            timestamp,
            nonce: 0,
            block_version,
            mining_difficulty,
            unconsumed_outputs,
            unsigned_transactions,
        }
    }

    /// Builds a block with the globally configured version and difficulty.
    pub fn with_defaults(
        previous_hash: impl Into<String>,
        unconsumed_outputs: Vec<TransactionOutput>,
    ) -> Block {
        Block::new(
            previous_hash,
            GLOBAL_CONFIG.get_block_version(),
            GLOBAL_CONFIG.get_mining_difficulty(),
            unconsumed_outputs,
        )
    }

    /// Adds a transaction to this block.
    ///
    /// Unsigned transactions go to the pending queue instead. For signed
    /// ones: if any referenced input is missing from the unconsumed pool the
    /// transaction is silently skipped with no partial consumption.
    /// Otherwise all referenced outputs leave the pool, all produced outputs
    /// enter it, and the transaction is accepted if it validates. A
    /// transaction whose entry processing failed ends up pooled but
    /// excluded from the accepted list.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        if transaction.signature().is_none() {
            self.unsigned_transactions.push(transaction);
            return;
        }

        if let Some(inputs) = transaction.inputs() {
            for input in inputs {
                let wanted = input.output().output_id();
                if !self
                    .unconsumed_outputs
                    .iter()
                    .any(|output| output.output_id() == wanted)
                {
                    warn!(
                        "skipping transaction {}: input {} is not in the unconsumed pool",
                        transaction.id().unwrap_or(""),
                        wanted
                    );
                    return;
                }
            }

            for input in inputs {
                let consumed = input.output().output_id();
                self.unconsumed_outputs
                    .retain(|output| output.output_id() != consumed);
            }
        }
        self.unconsumed_outputs
            .extend_from_slice(transaction.outputs());

        if transaction.validate() {
            self.transactions.push(transaction);
        }
    }

    /// Installs a signature on a queued unsigned transaction. When the
    /// signature verifies, the transaction leaves the pending queue and goes
    /// through the normal pool-update and acceptance path.
    pub fn sign_transaction(&mut self, transaction_id: &str, signature: Vec<u8>) {
        let position = self
            .unsigned_transactions
            .iter()
            .position(|transaction| transaction.id() == Some(transaction_id));

        if let Some(position) = position {
            if self.unsigned_transactions[position].set_signature(signature) {
                let transaction = self.unsigned_transactions.remove(position);
                self.add_transaction(transaction);
            }
        }
    }

    /// Seals this block: searches for a nonce whose hash carries the
    /// required zero prefix. No-op on an already sealed block. Runs on the
    /// calling thread with no timeout; see `mine_hash_cancellable` for
    /// bounded runs.
    pub fn mine_hash(&mut self) {
        if !self.hash.is_empty() {
            return;
        }

        info!(
            "mining block {} at difficulty {}",
            self.id, self.mining_difficulty
        );
        let pow = ProofOfWork::new(self.hash_base(), self.mining_difficulty);
        let (nonce, hash) = pow.run(self.nonce);
        self.nonce = nonce;
        self.hash = hash;
        info!("mined block {}: {}", self.id, self.hash);
    }

    /// A cancellable `mine_hash`. Returns true when the block is sealed;
    /// on cancellation the nonce keeps the search position so a later call
    /// resumes where this one stopped.
    pub fn mine_hash_cancellable(&mut self, cancel: &AtomicBool) -> bool {
        if !self.hash.is_empty() {
            return true;
        }

        let pow = ProofOfWork::new(self.hash_base(), self.mining_difficulty);
        match pow.search(self.nonce, cancel) {
            MiningOutcome::Found { nonce, hash } => {
                self.nonce = nonce;
                self.hash = hash;
                true
            }
            MiningOutcome::Cancelled { next_nonce } => {
                self.nonce = next_nonce;
                false
            }
        }
    }

    /// Validates this block: every accepted transaction validates and the
    /// sealed hash recomputes from the header, transactions and nonce.
    /// Unmined blocks are invalid. Never raises.
    pub fn is_block_valid(&self) -> bool {
        for transaction in &self.transactions {
            if !transaction.validate() {
                return false;
            }
        }

        let expected = crate::utils::hash_string(&format!("{}{}", self.hash_base(), self.nonce));
        expected == self.hash
    }

    /// The pre-image base for mining: header plus the canonical text of the
    /// accepted transactions.
    fn hash_base(&self) -> String {
        format!("{}{}", self.header(), list_text(&self.transactions))
    }

    /// Header: timestamp, version and previous hash concatenated in that
    /// order.
    fn header(&self) -> String {
        format!(
            "{}{}{}",
            self.timestamp, self.block_version, self.previous_hash
        )
    }

    /// Pool outputs authored by the given key.
    pub fn authored_by(&self, author: &PublicKey) -> Vec<&TransactionOutput> {
        self.unconsumed_outputs
            .iter()
            .filter(|output| output.is_addressed_from(author))
            .collect()
    }

    /// Pool outputs authored by the given key and carrying the given entry
    /// kind.
    pub fn authored_by_of_kind(
        &self,
        author: &PublicKey,
        kind: EntryKind,
    ) -> Vec<&TransactionOutput> {
        self.unconsumed_outputs
            .iter()
            .filter(|output| output.is_addressed_from(author) && output.data().kind() == kind)
            .collect()
    }

    /// Pool outputs carrying open elections, optionally filtered by caller.
    pub fn get_open_elections(&self, caller: Option<&PublicKey>) -> Vec<&TransactionOutput> {
        self.unconsumed_outputs
            .iter()
            .filter(|output| {
                output.data().kind() == EntryKind::Elections
                    && caller.map_or(true, |key| output.is_addressed_from(key))
            })
            .collect()
    }

    /// Queued unsigned transactions, optionally filtered by the signer's
    /// key text.
    pub fn get_unsigned_transactions(&self, signer: Option<&str>) -> Vec<&Transaction> {
        self.unsigned_transactions
            .iter()
            .filter(|transaction| {
                signer.map_or(true, |key| transaction.signee().to_base64() == key)
            })
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn block_version(&self) -> &str {
        &self.block_version
    }

    pub fn mining_difficulty(&self) -> usize {
        self.mining_difficulty
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn unconsumed_outputs(&self) -> &[TransactionOutput] {
        &self.unconsumed_outputs
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block. ID: {} date: {} version: {}",
            self.id, self.timestamp, self.block_version
        )
    }
}
