use crate::account::PublicKey;
use crate::core::entry::Entry;
use crate::core::transaction::{TransactionInput, TransactionOutput};
use crate::error::{LedgerError, Result};
use crate::utils::{current_timestamp, hash_string};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single vote cast in particular elections.
///
/// The chosen answer is held either as text or as an index into the
/// elections' answer set, with `-1` marking "use the text". Processing
/// resolves whichever side is present and fills the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// The public key of the voting account.
    voter: PublicKey,
    /// The id of the elections this vote was cast in.
    elections_id: String,
    answer: String,
    answer_index: i32,
    id: Option<String>,
    timestamp: i64,
}

impl Vote {
    /// A vote carrying its answer as text.
    pub fn for_answer(
        voter: PublicKey,
        elections_id: impl Into<String>,
        answer: impl Into<String>,
    ) -> Vote {
        Vote {
            voter,
            elections_id: elections_id.into(),
            answer: answer.into(),
            answer_index: -1,
            id: None,
            timestamp: current_timestamp(),
        }
    }

    /// A vote carrying its answer as an index into the elections' answers.
    pub fn for_answer_index(
        voter: PublicKey,
        elections_id: impl Into<String>,
        answer_index: i32,
    ) -> Vote {
        Vote {
            voter,
            elections_id: elections_id.into(),
            answer: String::new(),
            answer_index,
            id: None,
            timestamp: current_timestamp(),
        }
    }

    /// Resolves the answer against the referenced elections and sets the
    /// vote id.
    ///
    /// `inputs` must hold exactly one input referencing a processed
    /// elections output whose id matches this vote's `elections_id`; any
    /// other shape, an out-of-range index, or an answer outside the
    /// elections' answer set is an argument error. The vote is left
    /// untouched on failure.
    pub fn process_entry(
        &mut self,
        inputs: Option<&[TransactionInput]>,
    ) -> Result<Vec<TransactionOutput>> {
        let inputs = inputs.unwrap_or_default();
        if inputs.len() != 1 {
            return Err(LedgerError::InvalidArgument(
                "a vote needs exactly one input referencing an elections output".to_string(),
            ));
        }

        let elections = match inputs[0].output().data() {
            Entry::Elections(elections) => elections,
            _ => {
                return Err(LedgerError::InvalidArgument(
                    "a vote's input must reference an elections output".to_string(),
                ))
            }
        };

        match elections.id() {
            Some(id) if id == self.elections_id => {}
            _ => {
                return Err(LedgerError::InvalidArgument(format!(
                    "the vote's elections id {} does not match the referenced elections",
                    self.elections_id
                )))
            }
        }

        let answers = elections.answers();
        if self.answer_index < -1 || self.answer_index >= answers.len() as i32 {
            return Err(LedgerError::InvalidArgument(format!(
                "answer index {} is out of range of the possible answers",
                self.answer_index
            )));
        }

        // Resolve into locals first so a failure leaves the vote untouched.
        let (resolved_answer, resolved_index) = if !self.answer.is_empty() {
            match answers.iter().position(|answer| *answer == self.answer) {
                Some(index) => (self.answer.clone(), index as i32),
                None => {
                    return Err(LedgerError::InvalidArgument(format!(
                        "answer {:?} is not an element of the possible elections answers",
                        self.answer
                    )))
                }
            }
        } else if self.answer_index >= 0 {
            (
                answers[self.answer_index as usize].clone(),
                self.answer_index,
            )
        } else {
            return Err(LedgerError::InvalidArgument(
                "the vote carries neither an answer nor an answer index".to_string(),
            ));
        };

        self.answer = resolved_answer;
        self.answer_index = resolved_index;
        self.id = Some(hash_string(&self.id_preimage()));
        Ok(Vec::new())
    }

    /// True when the stored id matches a fresh recomputation. False for
    /// unprocessed votes.
    pub fn validate_entry(&self) -> bool {
        match &self.id {
            Some(id) => *id == hash_string(&self.id_preimage()),
            None => false,
        }
    }

    fn id_preimage(&self) -> String {
        format!(
            "{}{}{}{}",
            self.voter.to_base64(),
            self.elections_id,
            self.answer,
            self.timestamp
        )
    }

    pub fn voter(&self) -> &PublicKey {
        &self.voter
    }

    pub fn elections_id(&self) -> &str {
        &self.elections_id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn answer_index(&self) -> i32 {
        self.answer_index
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vote: {} elections: {} answer: {}",
            self.id.as_deref().unwrap_or(""),
            self.elections_id,
            self.answer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::core::entry::Elections;

    fn processed_elections(account: &Account) -> Elections {
        let mut elections = Elections::new(
            account.public_key().clone(),
            "Q",
            vec!["a1".to_string(), "a2".to_string()],
        );
        elections.process_entry(None).unwrap();
        elections
    }

    fn elections_input(account: &Account, elections: &Elections) -> TransactionInput {
        TransactionInput::from_output(TransactionOutput::new(
            account.public_key().clone(),
            Entry::Elections(elections.clone()),
            None,
        ))
    }

    #[test]
    fn test_process_by_answer_fills_index() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let input = elections_input(&account, &elections);

        let mut vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a2",
        );
        vote.process_entry(Some(&[input])).unwrap();

        assert_eq!(1, vote.answer_index());
        assert_eq!(64, vote.id().unwrap().len());
        assert!(vote.validate_entry());
    }

    #[test]
    fn test_process_by_index_fills_answer() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let input = elections_input(&account, &elections);

        let mut vote =
            Vote::for_answer_index(account.public_key().clone(), elections.id().unwrap(), 0);
        vote.process_entry(Some(&[input])).unwrap();

        assert_eq!("a1", vote.answer());
        assert!(vote.validate_entry());
    }

    #[test]
    fn test_process_rejects_wrong_input_count() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);

        let mut vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a1",
        );
        let result = vote.process_entry(None);
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));

        let inputs = vec![
            elections_input(&account, &elections),
            elections_input(&account, &elections),
        ];
        let result = vote.process_entry(Some(&inputs));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        assert!(vote.id().is_none());
    }

    #[test]
    fn test_process_rejects_non_elections_input() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let mut other_vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a1",
        );
        other_vote
            .process_entry(Some(&[elections_input(&account, &elections)]))
            .unwrap();
        let vote_input = TransactionInput::from_output(TransactionOutput::new(
            account.public_key().clone(),
            Entry::Vote(other_vote),
            None,
        ));

        let mut vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a1",
        );
        let result = vote.process_entry(Some(&[vote_input]));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    #[test]
    fn test_process_rejects_mismatched_elections_id() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let input = elections_input(&account, &elections);

        let mut vote = Vote::for_answer(account.public_key().clone(), "deadbeef", "a1");
        let result = vote.process_entry(Some(&[input]));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        assert!(vote.id().is_none());
    }

    #[test]
    fn test_out_of_range_index_never_sets_id() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);

        for bad_index in [-2, 2, 100] {
            let input = elections_input(&account, &elections);
            let mut vote = Vote::for_answer_index(
                account.public_key().clone(),
                elections.id().unwrap(),
                bad_index,
            );
            let result = vote.process_entry(Some(&[input]));
            assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
            assert!(vote.id().is_none());
        }
    }

    #[test]
    fn test_unknown_answer_is_rejected() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let input = elections_input(&account, &elections);

        let mut vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a3",
        );
        let result = vote.process_entry(Some(&[input]));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        assert!(vote.id().is_none());
    }

    #[test]
    fn test_empty_answer_with_sentinel_index_is_rejected() {
        let account = Account::new().unwrap();
        let elections = processed_elections(&account);
        let input = elections_input(&account, &elections);

        let mut vote =
            Vote::for_answer_index(account.public_key().clone(), elections.id().unwrap(), -1);
        let result = vote.process_entry(Some(&[input]));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }
}
