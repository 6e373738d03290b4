use crate::account::PublicKey;
use crate::core::entry::list_text;
use crate::core::transaction::{TransactionInput, TransactionOutput};
use crate::error::{LedgerError, Result};
use crate::utils::{current_timestamp, hash_string};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A call for elections: a question and the closed set of possible answers.
///
/// The question and answers stay mutable until the elections are processed;
/// mutating them afterwards makes `validate_entry` fail because the stored
/// id no longer matches the recomputed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elections {
    /// The public key of the account calling these elections.
    caller: PublicKey,
    id: Option<String>,
    question: String,
    answers: Vec<String>,
    timestamp: i64,
}

impl Elections {
    pub fn new(caller: PublicKey, question: impl Into<String>, answers: Vec<String>) -> Elections {
        Elections {
            caller,
            id: None,
            question: question.into(),
            answers,
            timestamp: current_timestamp(),
        }
    }

    /// Sets the id of these elections after checking the question and
    /// answers.
    ///
    /// Elections consume nothing, so `inputs` must be `None`; anything else
    /// is an argument error. An empty answer set or an empty question is a
    /// domain error. Produces no outputs of its own - the enclosing
    /// transaction appends the elections output.
    pub fn process_entry(
        &mut self,
        inputs: Option<&[TransactionInput]>,
    ) -> Result<Vec<TransactionOutput>> {
        if inputs.is_some() {
            return Err(LedgerError::InvalidArgument(
                "inputs must be absent when processing elections".to_string(),
            ));
        }

        if self.answers.is_empty() {
            return Err(LedgerError::Entry(
                "the set of possible answers must not be empty".to_string(),
            ));
        }

        if self.question.is_empty() {
            return Err(LedgerError::Entry(
                "the elections question must not be empty".to_string(),
            ));
        }

        self.id = Some(hash_string(&self.id_preimage()));
        Ok(Vec::new())
    }

    /// True when the stored id matches a fresh recomputation from the
    /// current fields. False for unprocessed elections.
    pub fn validate_entry(&self) -> bool {
        match &self.id {
            Some(id) => *id == hash_string(&self.id_preimage()),
            None => false,
        }
    }

    fn id_preimage(&self) -> String {
        format!(
            "{}{}{}{}",
            self.caller.to_base64(),
            self.timestamp,
            self.question,
            self.answers_text()
        )
    }

    pub(crate) fn answers_text(&self) -> String {
        list_text(&self.answers)
    }

    /// The question and answers as a field-name to value-list mapping,
    /// shaped like a tally summary.
    pub fn metadata(&self) -> HashMap<String, Vec<String>> {
        let mut metadata = HashMap::new();
        metadata.insert("question".to_string(), vec![self.question.clone()]);
        metadata.insert("answers".to_string(), self.answers.clone());
        metadata
    }

    pub fn caller(&self) -> &PublicKey {
        &self.caller
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn set_answers(&mut self, answers: Vec<String>) {
        self.answers = answers;
    }
}

impl fmt::Display for Elections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elections: {}\nQuestion:{}\nAnswers: {}",
            self.id.as_deref().unwrap_or(""),
            self.question,
            self.answers_text()
        )
    }
}
