use crate::{
    crypto::{Hash, Hashable},
    serializer::{Reader, ReaderError, Serializer, Writer},
    transaction::Transaction,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The header fields validation observes. Consensus fields that only the
/// chain-selection pipeline reads (difficulty, nonce) live outside this
/// crate.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BlockHeader {
    height: u64,
    previous_hash: Hash,
    timestamp: u64,
}

impl BlockHeader {
    pub fn new(height: u64, previous_hash: Hash, timestamp: u64) -> Self {
        Self {
            height,
            previous_hash,
            timestamp,
        }
    }

    pub fn get_height(&self) -> u64 {
        self.height
    }

    pub fn get_previous_hash(&self) -> &Hash {
        &self.previous_hash
    }

    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl Serializer for BlockHeader {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self.height);
        writer.write_hash(&self.previous_hash);
        writer.write_u64(self.timestamp);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            height: reader.read_u64()?,
            previous_hash: reader.read_hash()?,
            timestamp: reader.read_u64()?,
        })
    }

    fn size(&self) -> usize {
        8 + self.previous_hash.size() + 8
    }
}

impl Hashable for BlockHeader {}

/// A block as the validation pipelines see it: a header plus the ordered
/// transaction list. Transaction order is consensus-relevant — index 0 is
/// the proof/reward transaction, and in-block double-spend scanning walks
/// the list in order.
#[derive(Clone, Debug)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Arc<Transaction>>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Arc<Transaction>>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    pub fn get_header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn get_height(&self) -> u64 {
        self.header.get_height()
    }

    pub fn get_transactions(&self) -> &[Arc<Transaction>] {
        &self.transactions
    }

    /// Position of a transaction inside this block, by hash.
    pub fn position_of(&self, tx_hash: &Hash) -> Option<usize> {
        self.transactions
            .iter()
            .position(|tx| tx.hash() == *tx_hash)
    }

    pub fn hash(&self) -> Hash {
        self.header.hash()
    }
}
