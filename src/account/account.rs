use crate::core::{Elections, Entry, Tally, Transaction, TransactionInput, Vote};
use crate::error::Result;
use crate::utils::{ecdsa_p256_sha256_sign_digest, new_key_pair, public_key_from_pkcs8};
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A public ECDSA P-256 key in its canonical encoded form.
///
/// The key doubles as the identity of the agent holding it: entries record
/// their author as a `PublicKey`, and the unconsumed-output pool is filtered
/// by it. The base64 text form is the representation used inside every hash
/// preimage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn from_bytes(bytes: Vec<u8>) -> PublicKey {
        PublicKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The canonical text form of this key: base64 of its encoded bytes.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0.as_slice())
    }

    pub fn from_base64(text: &str) -> Result<PublicKey> {
        let bytes = BASE64.decode(text.as_bytes()).map_err(|e| {
            crate::error::LedgerError::Crypto(format!("Invalid base64 public key: {e}"))
        })?;
        Ok(PublicKey(bytes))
    }
}

/// A single agent in the voting ledger: an ECDSA key pair plus the
/// high-level operations it performs (calling elections, voting, tallying).
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pkcs8: Vec<u8>,
    public_key: PublicKey,
}

impl Account {
    /// Creates an account with a freshly generated ECDSA P-256 key pair.
    pub fn new() -> Result<Account> {
        let pkcs8 = new_key_pair()?;
        Account::from_pkcs8(pkcs8)
    }

    /// Restores an account from a PKCS8 key pair document.
    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Account> {
        let public_key = PublicKey::from_bytes(public_key_from_pkcs8(&pkcs8)?);
        Ok(Account { pkcs8, public_key })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Signs a transaction with this account's private key.
    pub fn sign_transaction(&self, transaction: &mut Transaction) -> Result<()> {
        transaction.sign(&self.pkcs8)
    }

    /// Produces the detached signature over a transaction's sign data,
    /// without installing it. Used by the two-phase signing workflow where a
    /// block queues unsigned transactions until their signers countersign.
    pub fn sign_data(&self, data: &str) -> Result<Vec<u8>> {
        ecdsa_p256_sha256_sign_digest(&self.pkcs8, data.as_bytes())
    }

    /// Calls new elections: builds, processes and signs a transaction
    /// carrying an [`Elections`] entry. The result is ready to be added to a
    /// block.
    pub fn create_elections(&self, question: &str, answers: Vec<String>) -> Result<Transaction> {
        let elections = Elections::new(self.public_key.clone(), question, answers);
        let mut transaction =
            Transaction::new(self.public_key.clone(), Entry::Elections(elections), None);
        self.sign_transaction(&mut transaction)?;
        Ok(transaction)
    }

    /// Votes in elections. `inputs` must hold exactly the transaction input
    /// wrapping the elections output being voted in.
    pub fn vote(
        &self,
        answer: &str,
        elections: &Elections,
        inputs: Vec<TransactionInput>,
    ) -> Result<Transaction> {
        let vote = Vote::for_answer(
            self.public_key.clone(),
            elections.id().unwrap_or_default(),
            answer,
        );
        let mut transaction =
            Transaction::new(self.public_key.clone(), Entry::Vote(vote), Some(inputs));
        self.sign_transaction(&mut transaction)?;
        Ok(transaction)
    }

    /// Tallies elections. The first input wraps the elections output, the
    /// following inputs wrap the vote outputs to count.
    pub fn tally(&self, inputs: Vec<TransactionInput>) -> Result<Transaction> {
        let tally = Tally::new(self.public_key.clone());
        let mut transaction =
            Transaction::new(self.public_key.clone(), Entry::Tally(tally), Some(inputs));
        self.sign_transaction(&mut transaction)?;
        Ok(transaction)
    }

    /// Exports the raw DER key material to `<stem>.key` (PKCS8 key pair) and
    /// `<stem>.pub` (public key) under `dir`.
    pub fn export_keys(&self, dir: &Path, stem: &str) -> Result<()> {
        fs::write(dir.join(format!("{stem}.key")), &self.pkcs8)?;
        fs::write(dir.join(format!("{stem}.pub")), self.public_key.as_bytes())?;
        Ok(())
    }
}
