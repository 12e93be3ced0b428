use crate::error::ValidationError;
use crate::hash::hash_block;
use crate::pow::ProofOfWork;
use crate::Block;

/// Re-derives every link and every proof of a candidate chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    pub fn is_valid(&self, chain: &[Block]) -> bool {
        self.validate(chain).is_ok()
    }

    /// Walk adjacent pairs in order and stop at the first failure. A single
    /// block is valid on its own; an empty chain is not.
    pub fn validate(&self, chain: &[Block]) -> Result<(), ValidationError> {
        if chain.is_empty() {
            return Err(ValidationError::Empty);
        }
        for (position, pair) in chain.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = position + 1;
            let expected =
                hash_block(previous).map_err(|_| ValidationError::Unhashable(position - 1))?;
            if current.previous_hash != expected {
                return Err(ValidationError::BrokenLink(position));
            }
            if !self.pow.verify(current.proof, previous.proof) {
                return Err(ValidationError::InvalidProof(position));
            }
        }
        Ok(())
    }
}
