//! Proof-of-work puzzle.
//!
//! A proof `p` is accepted against the previous block's proof `q` when the
//! SHA-256 hex digest of the decimal string of `p² - q²` starts with
//! `difficulty` `'0'` characters. Each extra digit of difficulty multiplies
//! the expected search cost by 16; at the default of 4 a solve takes about
//! 65k hashes, so tests that mine whole chains should lower it.

use crate::constants::{POW_DIFFICULTY, PROOF_SEARCH_WINDOW};
use crate::hash::sha256_hex;
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(POW_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Smallest proof, counting up from 1, that satisfies `verify` against
    /// `previous_proof`. Blocks the calling thread until found.
    pub fn solve(&self, previous_proof: i64) -> i64 {
        let mut proof = 1;
        while !self.verify(proof, previous_proof) {
            proof += 1;
        }
        proof
    }

    /// Same answer as [`ProofOfWork::solve`], searched window by window across
    /// the rayon pool. `find_first` keeps the lowest hit inside a window, and
    /// windows are scanned in ascending order.
    pub fn solve_parallel(&self, previous_proof: i64) -> i64 {
        let mut start = 1i64;
        loop {
            let end = start.saturating_add(PROOF_SEARCH_WINDOW);
            let found = (start..end)
                .into_par_iter()
                .find_first(|proof| self.verify(*proof, previous_proof));
            if let Some(proof) = found {
                debug!(previous_proof, proof, "solved proof of work");
                return proof;
            }
            start = end;
        }
    }

    pub fn verify(&self, proof: i64, previous_proof: i64) -> bool {
        meets_difficulty(&puzzle_digest(proof, previous_proof), self.difficulty)
    }
}

/// `proof² - previous_proof²`, widened so that no i64 input can overflow.
pub fn puzzle_input(proof: i64, previous_proof: i64) -> i128 {
    let p = i128::from(proof);
    let q = i128::from(previous_proof);
    p * p - q * q
}

pub fn puzzle_digest(proof: i64, previous_proof: i64) -> String {
    sha256_hex(puzzle_input(proof, previous_proof).to_string())
}

pub fn count_leading_zero_digits(hex: &str) -> usize {
    hex.bytes().take_while(|b| *b == b'0').count()
}

pub fn meets_difficulty(hex: &str, difficulty: usize) -> bool {
    count_leading_zero_digits(hex) >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_digit_examples() {
        assert_eq!(count_leading_zero_digits("0000c008"), 4);
        assert_eq!(count_leading_zero_digits("00a0"), 2);
        assert_eq!(count_leading_zero_digits("f000"), 0);
        assert_eq!(count_leading_zero_digits(""), 0);
        assert!(meets_difficulty("000abc", 3));
        assert!(!meets_difficulty("000abc", 4));
        assert!(meets_difficulty("abc", 0));
    }

    #[test]
    fn puzzle_input_is_signed() {
        assert_eq!(puzzle_input(533, 1), 284_088);
        assert_eq!(puzzle_input(1, 533), -284_088);
        assert_eq!(puzzle_input(7, 7), 0);
        assert_eq!(
            puzzle_input(i64::MAX, 0),
            i128::from(i64::MAX) * i128::from(i64::MAX)
        );
    }

    #[test]
    fn solve_from_genesis_example() {
        let pow = ProofOfWork::default();
        let proof = pow.solve(1);
        assert_eq!(proof, 533);
        assert!(puzzle_digest(proof, 1).starts_with("0000"));
        assert!(pow.verify(proof, 1));
        assert!(!pow.verify(proof - 1, 1));
        assert!((1..proof).all(|p| !pow.verify(p, 1)));
    }

    #[test]
    fn solve_chains_from_previous_proof() {
        let pow = ProofOfWork::default();
        assert_eq!(pow.solve(533), 45_293);
    }

    #[test]
    fn verify_is_symmetric_with_solve() {
        let pow = ProofOfWork::new(2);
        for previous in [1, 7, 308, 1_000, -42] {
            let proof = pow.solve(previous);
            assert!(proof >= 1);
            assert!(pow.verify(proof, previous), "previous = {previous}");
        }
    }

    #[test]
    fn parallel_solve_matches_sequential() {
        let pow = ProofOfWork::new(2);
        for previous in [1, 7, 308, 431] {
            assert_eq!(pow.solve_parallel(previous), pow.solve(previous));
        }
        assert_eq!(ProofOfWork::default().solve_parallel(1), 533);
    }

    #[test]
    fn zero_difficulty_accepts_first_candidate() {
        let pow = ProofOfWork::new(0);
        assert_eq!(pow.solve(99), 1);
        assert_eq!(pow.solve_parallel(99), 1);
    }

    #[test]
    fn default_difficulty_is_four() {
        assert_eq!(ProofOfWork::default().difficulty(), POW_DIFFICULTY);
        assert_eq!(POW_DIFFICULTY, 4);
    }
}
