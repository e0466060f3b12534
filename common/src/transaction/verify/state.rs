use std::{collections::BTreeSet, sync::Arc};

use crate::{
    account::ValidatorState,
    asset::{CoinId, MintCoinState},
    block::Block,
    crypto::{Address, Hash},
    transaction::Transaction,
};

/// A transaction as stored on chain: the transaction itself plus its
/// confirmation height, if any.
#[derive(Clone, Debug)]
pub struct TxEntry {
    tx: Arc<Transaction>,
    height: Option<u64>,
}

impl TxEntry {
    pub fn new(tx: Arc<Transaction>, height: Option<u64>) -> Self {
        Self { tx, height }
    }

    pub fn unconfirmed(tx: Arc<Transaction>) -> Self {
        Self::new(tx, None)
    }

    pub fn get_tx(&self) -> &Arc<Transaction> {
        &self.tx
    }

    /// Height of the confirming block, `None` while in the pool.
    pub fn get_height(&self) -> Option<u64> {
        self.height
    }

    pub fn is_confirmed(&self) -> bool {
        self.height.is_some()
    }
}

/// Point-in-time view of the ledger the checkers validate against.
///
/// Every method is a read of an immutable snapshot: the `best_block` /
/// `stop_txhash` arguments fix the point the answer is computed "as of", so
/// concurrent validation workers can share one provider as long as each call
/// names a stable snapshot. The checkers assume but do not enforce that
/// consistency contract.
pub trait ChainProvider {
    /// Resolve a transaction by hash, with its confirmation height.
    fn get_tx(&self, hash: &Hash) -> Option<TxEntry>;

    /// Output indexes of `hash` already consumed by the confirmed ledger,
    /// as of the snapshot the candidate block builds on.
    fn get_used_index(&self, hash: &Hash, best_block: Option<&Block>) -> BTreeSet<u32>;

    /// Validator snapshot for an address, folded from the edit log up to
    /// the stop point (exclusive of `stop_txhash` itself).
    fn get_validator_state(
        &self,
        address: &Address,
        best_block: Option<&Block>,
        stop_txhash: &Hash,
    ) -> ValidatorState;

    /// Mint coin snapshot, folded from the mint log up to the stop point
    /// (exclusive of `stop_txhash` itself).
    fn get_mintcoin_state(
        &self,
        coin_id: CoinId,
        best_block: Option<&Block>,
        stop_txhash: &Hash,
    ) -> MintCoinState;

    /// Height of the best confirmed block.
    fn get_best_height(&self) -> u64;
}
