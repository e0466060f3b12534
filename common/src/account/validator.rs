use crate::{
    crypto::{Address, Hash},
    transaction::ValidatorEditPayload,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Point-in-time snapshot of a validator address: the member set and the
/// signature threshold backing it.
///
/// A snapshot is never mutated in place by the chain. It is reconstructed by
/// folding the accepted validator-edit transactions for the address up to a
/// stop point, so the same log prefix always yields the same state and a
/// reorg simply folds a different prefix.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidatorState {
    /// Edit count, -1 until the first accepted edit.
    version: i32,
    /// Member addresses allowed to co-sign for the validator address.
    validators: BTreeSet<Address>,
    /// How many member signatures satisfy the quorum.
    require: usize,
    /// Hash of the last edit folded in, if any.
    last_edit: Option<Hash>,
}

impl ValidatorState {
    /// The uninitialized sentinel: fails any check requiring initialization.
    pub fn uninitialized() -> Self {
        Self {
            version: -1,
            validators: BTreeSet::new(),
            require: 0,
            last_edit: None,
        }
    }

    pub fn get_version(&self) -> i32 {
        self.version
    }

    pub fn is_initialized(&self) -> bool {
        self.version >= 0
    }

    pub fn get_validators(&self) -> &BTreeSet<Address> {
        &self.validators
    }

    pub fn get_require(&self) -> usize {
        self.require
    }

    pub fn get_last_edit(&self) -> Option<&Hash> {
        self.last_edit.as_ref()
    }

    /// Fold one accepted edit into the snapshot, keyed by the authorizing
    /// transaction hash.
    pub fn apply(&mut self, tx_hash: Hash, edit: &ValidatorEditPayload) {
        if let Some(member) = edit.get_member() {
            if edit.is_removal() {
                self.validators.remove(member);
            } else {
                self.validators.insert(*member);
            }
        }

        let require = self.require as i64 + edit.get_require_diff() as i64;
        self.require = require.clamp(0, self.validators.len() as i64) as usize;

        self.version += 1;
        self.last_edit = Some(tx_hash);
    }

    /// Reconstruct a snapshot from an ordered edit log.
    pub fn reconstruct<'a, I>(edits: I) -> Self
    where
        I: IntoIterator<Item = (Hash, &'a ValidatorEditPayload)>,
    {
        let mut state = Self::uninitialized();
        for (tx_hash, edit) in edits {
            state.apply(tx_hash, edit);
        }
        state
    }
}
