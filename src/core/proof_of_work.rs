use crate::utils::hash_string;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// The brute-force search sealing a block: find a nonce whose hash carries
/// the required prefix of zero characters.
///
/// Wall-clock cost grows exponentially with the difficulty, so the search is
/// exposed as a cancellable, resumable loop: callers needing responsiveness
/// run it on a dedicated worker with a cancellation flag and keep the nonce
/// where a cancelled search stopped.
pub struct ProofOfWork {
    hash_base: String,
    difficulty: usize,
    target_prefix: String,
}

/// The result of a single search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningOutcome {
    /// A matching nonce was found; `hash` is the sealed block hash.
    Found { nonce: u64, hash: String },
    /// The search was cancelled; resume later from `next_nonce`.
    Cancelled { next_nonce: u64 },
}

impl ProofOfWork {
    pub fn new(hash_base: String, difficulty: usize) -> ProofOfWork {
        ProofOfWork {
            hash_base,
            difficulty,
            target_prefix: "0".repeat(difficulty),
        }
    }

    /// True when the candidate hash carries the required leading zeros.
    /// Difficulty 0 matches everything.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.len() >= self.difficulty && candidate[..self.difficulty] == self.target_prefix
    }

    fn candidate(&self, nonce: u64) -> String {
        hash_string(&format!("{}{}", self.hash_base, nonce))
    }

    /// Searches from `start_nonce` until a match is found or `cancel` is
    /// set. The cancellation flag is checked before every hash attempt.
    pub fn search(&self, start_nonce: u64, cancel: &AtomicBool) -> MiningOutcome {
        let mut nonce = start_nonce;
        loop {
            if cancel.load(Ordering::Relaxed) {
                debug!("mining cancelled at nonce {nonce}");
                return MiningOutcome::Cancelled { next_nonce: nonce };
            }

            let candidate = self.candidate(nonce);
            if self.matches(&candidate) {
                debug!("mining found nonce {nonce}: {candidate}");
                return MiningOutcome::Found {
                    nonce,
                    hash: candidate,
                };
            }
            nonce = nonce.wrapping_add(1);
        }
    }

    /// Runs the search to completion. Termination is probabilistic but
    /// almost sure for difficulties small relative to the 64-character
    /// output; there is no built-in timeout.
    pub fn run(&self, start_nonce: u64) -> (u64, String) {
        let mut nonce = start_nonce;
        loop {
            let candidate = self.candidate(nonce);
            if self.matches(&candidate) {
                return (nonce, candidate);
            }
            nonce = nonce.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_zero_matches_immediately() {
        let pow = ProofOfWork::new("T0v10".to_string(), 0);
        let (nonce, hash) = pow.run(0);
        assert_eq!(0, nonce);
        assert_eq!(64, hash.len());
    }

    #[test]
    fn test_found_hash_carries_zero_prefix() {
        let pow = ProofOfWork::new("T0v10".to_string(), 2);
        let (nonce, hash) = pow.run(0);
        assert!(hash.starts_with("00"));
        assert_eq!(hash, hash_string(&format!("T0v10{nonce}")));
    }

    #[test]
    fn test_search_resumes_from_start_nonce() {
        let pow = ProofOfWork::new("T0v10".to_string(), 1);
        let never = AtomicBool::new(false);

        let (nonce, _) = pow.run(0);
        match pow.search(nonce, &never) {
            MiningOutcome::Found { nonce: found, .. } => assert_eq!(nonce, found),
            MiningOutcome::Cancelled { .. } => panic!("search was not cancelled"),
        }
    }

    #[test]
    fn test_pre_set_cancel_flag_stops_before_hashing() {
        let pow = ProofOfWork::new("T0v10".to_string(), 4);
        let cancel = AtomicBool::new(true);

        assert_eq!(
            MiningOutcome::Cancelled { next_nonce: 7 },
            pow.search(7, &cancel)
        );
    }
}
