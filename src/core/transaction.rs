// The transaction layer of the voting ledger. A transaction wraps a single
// entry, consumes the outputs its inputs reference and produces new ones,
// following the UTXO model: outputs live in a block's unconsumed pool until
// some accepted transaction spends them.

use crate::account::PublicKey;
use crate::core::entry::Entry;
use crate::error::Result;
use crate::utils::{
    current_timestamp, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify, hash_string,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An unspent product of a transaction: an entry bound to the key that
/// authored it and to the transaction that produced it.
///
/// Each output carries a surrogate `output_id` assigned at creation; pool
/// membership and consumption match on that id rather than on object
/// identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutput {
    output_id: String,
    /// The public key this output was addressed from.
    author: PublicKey,
    data: Entry,
    /// The id of the transaction that produced this output. Absent until the
    /// producing transaction has an id of its own.
    parent_transaction_id: Option<String>,
}

impl TransactionOutput {
    pub fn new(
        author: PublicKey,
        data: Entry,
        parent_transaction_id: Option<String>,
    ) -> TransactionOutput {
        TransactionOutput {
            output_id: Uuid::new_v4().to_string(),
            author,
            data,
            parent_transaction_id,
        }
    }

    /// Wraps a transaction's signee, entry and id as an output.
    pub fn from_transaction(transaction: &Transaction) -> TransactionOutput {
        TransactionOutput::new(
            transaction.signee().clone(),
            transaction.data().clone(),
            transaction.id().map(String::from),
        )
    }

    pub fn is_addressed_from(&self, key: &PublicKey) -> bool {
        self.author == *key
    }

    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    pub fn author(&self) -> &PublicKey {
        &self.author
    }

    pub fn data(&self) -> &Entry {
        &self.data
    }

    pub fn parent_transaction_id(&self) -> Option<&str> {
        self.parent_transaction_id.as_deref()
    }
}

/// A reference to exactly one prior output. Inputs have no lifecycle of
/// their own; they exist to be matched against a block's unconsumed pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    output: TransactionOutput,
}

impl TransactionInput {
    pub fn from_output(output: TransactionOutput) -> TransactionInput {
        TransactionInput { output }
    }

    pub fn from_transaction(transaction: &Transaction) -> TransactionInput {
        TransactionInput {
            output: TransactionOutput::from_transaction(transaction),
        }
    }

    pub fn output(&self) -> &TransactionOutput {
        &self.output
    }
}

/// A single signed event in the ledger: starting elections, casting a vote
/// or tallying elections.
///
/// Construction processes the entry (fixing its id), computes the content
/// id, and fills the produced outputs. Signing comes afterwards and covers
/// the entry's text form at that moment, so an entry mutated after signing
/// makes `validate` fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// The public key of the agent signing this transaction.
    signee: PublicKey,
    data: Entry,
    inputs: Option<Vec<TransactionInput>>,
    /// Content id: hash over signee, data text and timestamp. Absent when
    /// entry processing failed.
    id: Option<String>,
    signature: Option<Vec<u8>>,
    timestamp: i64,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    /// Builds and processes a transaction.
    ///
    /// Entry processing failures do not surface here; the transaction comes
    /// back without an id and will never validate, and its outputs are the
    /// unchanged outputs its inputs referenced.
    pub fn new(
        signee: PublicKey,
        data: Entry,
        inputs: Option<Vec<TransactionInput>>,
    ) -> Transaction {
        let mut transaction = Transaction {
            signee,
            data,
            inputs,
            id: None,
            signature: None,
            timestamp: current_timestamp(),
            outputs: Vec::new(),
        };
        transaction.process_transaction();
        transaction
    }

    /// Processes the entry against the inputs' entries, computes the content
    /// id and appends this transaction's own output to whatever the entry
    /// produced.
    fn process_transaction(&mut self) {
        let mut outputs = match self.data.process_entry(self.inputs.as_deref()) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!("entry processing failed, transaction left without an id: {e}");
                self.outputs = self
                    .inputs
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|input| input.output().clone())
                    .collect();
                return;
            }
        };

        // The entry ids are fixed now; the content id hashes over them.
        self.id = Some(hash_string(&self.id_preimage()));
        outputs.push(TransactionOutput::new(
            self.signee.clone(),
            self.data.clone(),
            self.id.clone(),
        ));
        self.outputs = outputs;
    }

    fn id_preimage(&self) -> String {
        format!("{}{}{}", self.signee.to_base64(), self.data, self.timestamp)
    }

    /// The text covered by this transaction's signature. Note the field
    /// order differs from the id preimage; both are part of the wire format.
    pub fn sign_data(&self) -> String {
        format!("{}{}{}", self.signee.to_base64(), self.timestamp, self.data)
    }

    /// Signs this transaction with an ECDSA private key (PKCS8 document).
    pub fn sign(&mut self, pkcs8: &[u8]) -> Result<()> {
        let signature = ecdsa_p256_sha256_sign_digest(pkcs8, self.sign_data().as_bytes())?;
        self.signature = Some(signature);
        Ok(())
    }

    /// Verifies the detached signature against the signee's key. False when
    /// the transaction is unsigned or the signature does not match.
    pub fn verify_signature(&self) -> bool {
        match &self.signature {
            Some(signature) => ecdsa_p256_sha256_sign_verify(
                self.signee.as_bytes(),
                signature,
                self.sign_data().as_bytes(),
            ),
            None => false,
        }
    }

    /// Installs a signature produced elsewhere, keeping it only if it
    /// verifies. The transaction is unchanged when verification fails.
    pub fn set_signature(&mut self, signature: Vec<u8>) -> bool {
        self.signature = Some(signature);
        if self.verify_signature() {
            true
        } else {
            self.signature = None;
            false
        }
    }

    /// Validates this transaction: the signature verifies, the content id
    /// recomputes to the stored value, and the entry validates. Never
    /// raises.
    pub fn validate(&self) -> bool {
        if !self.verify_signature() {
            return false;
        }

        if self.id.as_deref() != Some(hash_string(&self.id_preimage()).as_str()) {
            return false;
        }

        self.data.validate_entry()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn signee(&self) -> &PublicKey {
        &self.signee
    }

    pub fn data(&self) -> &Entry {
        &self.data
    }

    pub fn inputs(&self) -> Option<&[TransactionInput]> {
        self.inputs.as_deref()
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transaction: {}", self.id.as_deref().unwrap_or(""))
    }
}
