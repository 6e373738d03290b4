use crate::core::block::Block;
use crate::error::Result;
use log::warn;
use serde::{Deserialize, Serialize};

/// The ordered, append-only sequence of blocks, starting from a designated
/// genesis block.
///
/// The hash of the newest block is cached so appends compare against it
/// without walking the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
    latest_block_hash: String,
}

impl Chain {
    pub fn new(genesis_block: Block) -> Chain {
        let latest_block_hash = genesis_block.hash().to_string();
        Chain {
            blocks: vec![genesis_block],
            latest_block_hash,
        }
    }

    /// Validates the whole history: the genesis block must be valid, and
    /// every later block must be valid and declare the previous block's
    /// sealed hash. Never raises.
    pub fn is_chain_valid(&self) -> bool {
        match self.blocks.first() {
            Some(genesis_block) => {
                if !genesis_block.is_block_valid() {
                    return false;
                }
            }
            None => return false,
        }

        for pair in self.blocks.windows(2) {
            if !pair[1].is_block_valid() {
                return false;
            }
            if pair[1].previous_hash() != pair[0].hash() {
                return false;
            }
        }
        true
    }

    /// Appends a block if it links to the newest block and is internally
    /// valid. Rejection is reported through the return value; the chain is
    /// unchanged and nothing is raised.
    pub fn add_block(&mut self, block: Block) -> bool {
        if block.previous_hash() != self.latest_block_hash {
            warn!(
                "rejecting block {}: previous hash does not match the latest block",
                block.id()
            );
            return false;
        }
        if !block.is_block_valid() {
            warn!("rejecting block {}: block does not validate", block.id());
            return false;
        }

        self.latest_block_hash = block.hash().to_string();
        self.blocks.push(block);
        true
    }

    /// The hash of the newest block in this chain.
    pub fn latest_block_hash(&self) -> &str {
        &self.latest_block_hash
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_at(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    /// Serializes the whole chain to JSON for inspection.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
