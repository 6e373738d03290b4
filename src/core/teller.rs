//! Vote counting
//!
//! Tallying is a pure aggregation of a vote set against an elections' answer
//! set. The [`Teller`] trait keeps the counting strategy pluggable; the
//! ledger ships [`VotesTeller`], which counts votes per answer.

use crate::core::entry::{Elections, Vote};
use crate::error::{LedgerError, Result};
use std::collections::HashMap;

/// An elections summary: a mapping from field name to a list of values.
/// The default teller fills `question`, `answers` and `voteCounts`.
pub type TallySummary = HashMap<String, Vec<String>>;

/// The capability of turning an elections and its votes into a summary.
pub trait Teller {
    fn tally_votes(&self, elections: &Elections, votes: &[Vote]) -> Result<TallySummary>;
}

/// The default teller: counts the votes cast for each possible answer.
///
/// Performs no validation of the votes; an answer missing from the
/// elections' answer set is a hard error, never silently skipped.
pub struct VotesTeller;

impl Teller for VotesTeller {
    fn tally_votes(&self, elections: &Elections, votes: &[Vote]) -> Result<TallySummary> {
        let answers = elections.answers();
        let mut vote_counts = vec![0u64; answers.len()];

        for vote in votes {
            let index = answers
                .iter()
                .position(|answer| answer == vote.answer())
                .ok_or_else(|| {
                    LedgerError::AnswerNotFound(format!(
                        "the answer {:?} in vote {} does not match any answer in the elections",
                        vote.answer(),
                        vote.id().unwrap_or("")
                    ))
                })?;
            vote_counts[index] += 1;
        }

        let mut summary = TallySummary::new();
        summary.insert(
            "question".to_string(),
            vec![elections.question().to_string()],
        );
        summary.insert("answers".to_string(), answers.to_vec());
        summary.insert(
            "voteCounts".to_string(),
            vote_counts.iter().map(|count| count.to_string()).collect(),
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::account::PublicKey;
    use crate::core::entry::{Entry, Vote};
    use crate::core::transaction::{TransactionInput, TransactionOutput};

    fn processed_elections(caller: &PublicKey) -> Elections {
        let mut elections = Elections::new(
            caller.clone(),
            "Q",
            vec!["a1".to_string(), "a2".to_string()],
        );
        elections.process_entry(None).unwrap();
        elections
    }

    fn processed_vote(voter: &PublicKey, elections: &Elections, answer: &str) -> Vote {
        let input = TransactionInput::from_output(TransactionOutput::new(
            voter.clone(),
            Entry::Elections(elections.clone()),
            None,
        ));
        let mut vote = Vote::for_answer(voter.clone(), elections.id().unwrap(), answer);
        vote.process_entry(Some(&[input])).unwrap();
        vote
    }

    #[test]
    fn test_counts_votes_per_answer() {
        let account = Account::new().unwrap();
        let elections = processed_elections(account.public_key());
        let votes = vec![
            processed_vote(account.public_key(), &elections, "a2"),
            processed_vote(account.public_key(), &elections, "a2"),
        ];

        let summary = VotesTeller.tally_votes(&elections, &votes).unwrap();

        assert_eq!(vec!["Q".to_string()], summary["question"]);
        assert_eq!(vec!["a1".to_string(), "a2".to_string()], summary["answers"]);
        assert_eq!(vec!["0".to_string(), "2".to_string()], summary["voteCounts"]);
    }

    #[test]
    fn test_no_votes_yields_zero_counts() {
        let account = Account::new().unwrap();
        let elections = processed_elections(account.public_key());

        let summary = VotesTeller.tally_votes(&elections, &[]).unwrap();
        assert_eq!(vec!["0".to_string(), "0".to_string()], summary["voteCounts"]);
    }

    #[test]
    fn test_unknown_answer_is_a_hard_error() {
        let account = Account::new().unwrap();
        let elections = processed_elections(account.public_key());
        // Built directly so the unknown answer reaches the teller unresolved
        let stray_vote = Vote::for_answer(
            account.public_key().clone(),
            elections.id().unwrap(),
            "a3",
        );

        let result = VotesTeller.tally_votes(&elections, &[stray_vote]);
        assert!(matches!(result, Err(LedgerError::AnswerNotFound(_))));
    }
}
