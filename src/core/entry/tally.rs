use crate::account::PublicKey;
use crate::core::entry::{list_text, Elections, Entry, Vote};
use crate::core::teller::{TallySummary, Teller, VotesTeller};
use crate::core::transaction::{TransactionInput, TransactionOutput};
use crate::error::{LedgerError, Result};
use crate::utils::{current_timestamp, hash_string};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tally of the votes cast in particular elections.
///
/// Processing checks that the elections and every vote validate and that all
/// votes were cast in those elections, then seals the tally id. The id is
/// guaranteed unchanged when processing fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tally {
    /// The public key of the account tallying the votes.
    teller: PublicKey,
    elections: Option<Elections>,
    votes: Vec<Vote>,
    id: Option<String>,
    timestamp: i64,
}

impl Tally {
    pub fn new(teller: PublicKey) -> Tally {
        Tally {
            teller,
            elections: None,
            votes: Vec::new(),
            id: None,
            timestamp: current_timestamp(),
        }
    }

    pub fn with_parts(teller: PublicKey, elections: Elections, votes: Vec<Vote>) -> Tally {
        Tally {
            teller,
            elections: Some(elections),
            votes,
            id: None,
            timestamp: current_timestamp(),
        }
    }

    /// Processes this tally from transaction inputs: the first input must
    /// reference an elections output and every following input a vote
    /// output. A wrong shape is an argument error.
    pub fn process_entry(
        &mut self,
        inputs: Option<&[TransactionInput]>,
    ) -> Result<Vec<TransactionOutput>> {
        let inputs = inputs.unwrap_or_default();
        if inputs.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "a tally needs an elections input followed by vote inputs".to_string(),
            ));
        }

        let elections = match inputs[0].output().data() {
            Entry::Elections(elections) => elections.clone(),
            _ => {
                return Err(LedgerError::InvalidArgument(
                    "the first tally input must reference an elections output".to_string(),
                ))
            }
        };

        let mut votes = Vec::with_capacity(inputs.len() - 1);
        for input in &inputs[1..] {
            match input.output().data() {
                Entry::Vote(vote) => votes.push(vote.clone()),
                _ => {
                    return Err(LedgerError::InvalidArgument(
                        "every tally input after the first must reference a vote output"
                            .to_string(),
                    ))
                }
            }
        }

        self.process_with(elections, votes)
    }

    /// Processes this tally against an elections and its votes directly.
    pub fn process_with(
        &mut self,
        elections: Elections,
        votes: Vec<Vote>,
    ) -> Result<Vec<TransactionOutput>> {
        self.elections = Some(elections);
        self.votes = votes;
        self.process()
    }

    /// Runs the tally checks over the currently held elections and votes and
    /// seals the tally id.
    ///
    /// Domain errors are raised before the id is touched: failed elections
    /// validation, a vote cast in different elections, or a vote that does
    /// not itself validate all leave the id in its previous state.
    pub fn process(&mut self) -> Result<Vec<TransactionOutput>> {
        {
            let elections = self.elections.as_ref().ok_or_else(|| {
                LedgerError::InvalidArgument("the tally has no elections to process".to_string())
            })?;

            if !elections.validate_entry() {
                return Err(LedgerError::Entry(format!(
                    "elections {} does not validate - its hash does not match its contents",
                    elections.id().unwrap_or("")
                )));
            }
            let elections_id = elections.id().unwrap_or("");

            for vote in &self.votes {
                if vote.elections_id() != elections_id {
                    return Err(LedgerError::Entry(format!(
                        "vote {} was cast in elections {} but should be cast in {}",
                        vote.id().unwrap_or(""),
                        vote.elections_id(),
                        elections_id
                    )));
                }
                if !vote.validate_entry() {
                    return Err(LedgerError::Entry(format!(
                        "vote {} does not validate - its hash does not match its contents",
                        vote.id().unwrap_or("")
                    )));
                }
            }
        }

        self.id = Some(hash_string(&self.id_preimage()));
        let output = TransactionOutput::new(self.teller.clone(), Entry::Tally(self.clone()), None);
        Ok(vec![output])
    }

    /// True when the stored id matches a fresh recomputation. False for
    /// unprocessed tallies.
    pub fn validate_entry(&self) -> bool {
        match (&self.id, &self.elections) {
            (Some(id), Some(_)) => *id == hash_string(&self.id_preimage()),
            _ => false,
        }
    }

    fn id_preimage(&self) -> String {
        let elections_id = self
            .elections
            .as_ref()
            .and_then(|elections| elections.id())
            .unwrap_or("");
        format!(
            "{}{}{}{}",
            self.teller.to_base64(),
            elections_id,
            self.votes_text(),
            self.timestamp
        )
    }

    fn votes_text(&self) -> String {
        list_text(&self.votes)
    }

    /// Counts the votes with the default [`VotesTeller`].
    pub fn summary(&self) -> Result<TallySummary> {
        self.summary_with(&VotesTeller)
    }

    /// Counts the votes with a caller-supplied teller.
    pub fn summary_with(&self, teller: &dyn Teller) -> Result<TallySummary> {
        let elections = self.elections.as_ref().ok_or_else(|| {
            LedgerError::InvalidArgument("the tally has no elections to summarize".to_string())
        })?;
        teller.tally_votes(elections, &self.votes)
    }

    pub fn teller(&self) -> &PublicKey {
        &self.teller
    }

    pub fn elections(&self) -> Option<&Elections> {
        self.elections.as_ref()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tally: {} elections: {}",
            self.id.as_deref().unwrap_or(""),
            self.elections
                .as_ref()
                .and_then(|elections| elections.id())
                .unwrap_or("")
        )
    }
}
