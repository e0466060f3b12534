mod error;
mod stake;
mod state;

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::{
    account::Balance,
    asset::{CoinId, MintRule, StandardMintRule},
    block::Block,
    config::{ChainParams, BASE_COIN_ID, MAX_REQUIRED_SIGNERS},
    crypto::{Address, AddressVersion, Hashable},
    serializer::Serializer,
    transaction::{MessageType, MintPayload, Transaction, TransactionType, TxInput, TxOutput},
};

pub use error::*;
pub use stake::*;
pub use state::*;

const STANDARD_MINT_RULE: StandardMintRule = StandardMintRule;

/// The validation predicates over one chain snapshot.
///
/// A verifier borrows its provider and parameters and holds no state of its
/// own: every check is a pure, synchronous predicate over the snapshot the
/// caller fixed, so any number of verifiers can run concurrently. The
/// `include_block` argument distinguishes the two pipelines — `None` for
/// pool admission, the candidate block for inclusion.
pub struct TxVerifier<'a, P: ChainProvider> {
    provider: &'a P,
    params: &'a ChainParams,
    mint_rule: &'a dyn MintRule,
}

impl<'a, P: ChainProvider> TxVerifier<'a, P> {
    pub fn new(provider: &'a P, params: &'a ChainParams) -> Self {
        Self::with_mint_rule(provider, params, &STANDARD_MINT_RULE)
    }

    /// Swap in a different mint transition rule set. Only the mint coin
    /// checker reads it.
    pub fn with_mint_rule(
        provider: &'a P,
        params: &'a ChainParams,
        mint_rule: &'a dyn MintRule,
    ) -> Self {
        Self {
            provider,
            params,
            mint_rule,
        }
    }

    /// Run every check a submitted transaction must pass.
    ///
    /// Origin, conservation and authorization for the plain classes; the
    /// mint coin validator owns its own balance and authorization rules.
    /// Proof classes (genesis, rewards) are built and validated by the
    /// block pipeline and never admitted here.
    pub fn verify(
        &self,
        tx: &Transaction,
        include_block: Option<&Block>,
    ) -> Result<(), VerificationError> {
        debug!(
            "verify tx {} type {:?} in_block={}",
            tx.hash(),
            tx.get_type(),
            include_block.is_some()
        );
        tx.verify_signatures()?;
        match tx.get_type() {
            TransactionType::Transfer | TransactionType::ValidatorEdit => {
                self.check_origins_and_spends(tx, include_block)?;
                self.check_value_conservation(tx, self.params.fee_coin_id)?;
                self.check_authorization(tx, include_block)?;
            }
            TransactionType::MintCoin => {
                self.check_origins_and_spends(tx, include_block)?;
                self.check_mint_coin(tx, include_block)?;
            }
            class => return Err(VerificationError::RestrictedClass(class)),
        }
        Ok(())
    }

    /// Resolve every input to its origin, enforce confirmed ancestry and
    /// reward maturity, and reject any reuse across the confirmed ledger
    /// and within the candidate block.
    ///
    /// Must run before value conservation: conservation sums resolved
    /// origins and assumes they exist.
    pub fn check_origins_and_spends(
        &self,
        tx: &Transaction,
        include_block: Option<&Block>,
    ) -> Result<(), VerificationError> {
        let tx_hash = tx.hash();
        let limit_height = self
            .provider
            .get_best_height()
            .saturating_sub(self.params.mature_height);

        for input in tx.get_inputs() {
            let origin = self.provider.get_tx(input.get_txhash()).ok_or_else(|| {
                VerificationError::OriginNotFound {
                    hash: input.get_txhash().clone(),
                    index: input.get_index(),
                }
            })?;

            match origin.get_height() {
                // an unconfirmed origin is fine in the pool, where both
                // transactions wait together, but a block may only build
                // on confirmed ancestry
                None => {
                    if include_block.is_some() {
                        return Err(VerificationError::PrematureInclusion {
                            origin: input.get_txhash().clone(),
                        });
                    }
                }
                Some(height) => {
                    if origin.get_tx().get_type().is_reward() && height > limit_height {
                        return Err(VerificationError::ImmatureReward {
                            origin: input.get_txhash().clone(),
                            height,
                            limit: limit_height,
                        });
                    }
                }
            }

            if self
                .provider
                .get_used_index(input.get_txhash(), include_block)
                .contains(&input.get_index())
            {
                return Err(VerificationError::AlreadySpent {
                    hash: input.get_txhash().clone(),
                    index: input.get_index(),
                });
            }

            // transactions earlier in the candidate block spend first
            if let Some(block) = include_block {
                for prior in block.get_transactions() {
                    if prior.hash() == tx_hash {
                        break;
                    }
                    if prior.get_inputs().contains(input) {
                        return Err(VerificationError::DoubleSpendInBlock {
                            hash: input.get_txhash().clone(),
                            index: input.get_index(),
                            by: prior.hash(),
                        });
                    }
                }
            }

            trace!("input {}:{} ok", input.get_txhash(), input.get_index());
        }
        Ok(())
    }

    /// Exact per-coin balance: inputs minus outputs minus fee must be
    /// empty. A nonzero residual in either direction is a rejection —
    /// value is neither created nor destroyed outside the mint path.
    pub fn check_value_conservation(
        &self,
        tx: &Transaction,
        payfee_coin_id: CoinId,
    ) -> Result<(), VerificationError> {
        let mut input_coins = Balance::new();
        for input in tx.get_inputs() {
            let origin = self.resolve_origin_output(input)?;
            input_coins.add(origin.get_coin_id(), origin.get_amount());
        }

        let mut output_coins = Balance::new();
        for (index, output) in tx.get_outputs().iter().enumerate() {
            if output.get_amount() == 0 {
                return Err(VerificationError::NonPositiveOutput { index });
            }
            output_coins.add(output.get_coin_id(), output.get_amount());
        }

        let fee_coins = Balance::with(payfee_coin_id, tx.get_fee());

        let remain = input_coins.clone() - &output_coins - &fee_coins;
        if !remain.is_empty() {
            return Err(VerificationError::ImbalancedTransaction {
                remain,
                inputs: input_coins,
                outputs: output_coins,
                fee: fee_coins,
            });
        }
        Ok(())
    }

    /// Build the set of addresses whose signature is mandatory and require
    /// it to equal the signed set exactly — a missing signature and an
    /// unnecessary one are both rejections.
    ///
    /// Validator-owned inputs delegate: the quorum must already be met by
    /// the signed set, and then the entire member set becomes required, so
    /// no member silently opts out of being accounted.
    pub fn check_authorization(
        &self,
        tx: &Transaction,
        include_block: Option<&Block>,
    ) -> Result<(), VerificationError> {
        let tx_hash = tx.hash();
        let signed_cks = tx.signed_addresses();
        let mut require_cks: BTreeSet<Address> = BTreeSet::new();
        let mut checked_cks: BTreeSet<Address> = BTreeSet::new();

        for input in tx.get_inputs() {
            let origin = self.resolve_origin_output(input)?;
            let address = *origin.get_address();
            if checked_cks.contains(&address) {
                continue;
            }

            match address.get_version() {
                Some(AddressVersion::Normal) => {
                    require_cks.insert(address);
                }
                Some(AddressVersion::Validator) => {
                    let validator =
                        self.provider
                            .get_validator_state(&address, include_block, &tx_hash);
                    if !validator.is_initialized() {
                        return Err(VerificationError::UninitializedValidator(address));
                    }
                    let signed = validator
                        .get_validators()
                        .intersection(&signed_cks)
                        .count();
                    if signed < validator.get_require() {
                        return Err(VerificationError::InsufficientValidatorSignatures {
                            signed,
                            require: validator.get_require(),
                        });
                    }
                    // quorum met: all members become accountable signers
                    require_cks.extend(validator.get_validators().iter().copied());
                }
                Some(AddressVersion::Contract) => {
                    return Err(VerificationError::ContractAddressNotAllowed(address));
                }
                None => {
                    return Err(VerificationError::UnrecognizedAddress {
                        address,
                        version: address.get_version_byte(),
                    });
                }
            }
            checked_cks.insert(address);
        }

        if require_cks.is_empty() || require_cks.len() > MAX_REQUIRED_SIGNERS {
            return Err(VerificationError::SignerCountOutOfRange(require_cks.len()));
        }
        require_exact_signers(&require_cks, &signed_cks)
    }

    /// Validate a mint coin issuance or amendment end to end: structural
    /// preconditions, gas, payload decoding, the transition rule, owner
    /// co-signing, and the balance-shape invariant.
    pub fn check_mint_coin(
        &self,
        tx: &Transaction,
        include_block: Option<&Block>,
    ) -> Result<(), VerificationError> {
        if tx.get_inputs().is_empty() || tx.get_outputs().is_empty() {
            return Err(VerificationError::MissingInputsOrOutputs);
        }
        if tx.get_message_type() != MessageType::Binary {
            return Err(VerificationError::InvalidMessageType {
                expected: MessageType::Binary,
                got: tx.get_message_type(),
            });
        }

        let tx_hash = tx.hash();
        if let Some(block) = include_block {
            if block.position_of(&tx_hash) == Some(0) {
                return Err(VerificationError::ReservedProofSlot);
            }
        }

        let required_gas = tx.size() as u64
            + tx.get_signatures().len() as u64 * self.params.signature_gas
            + self.params.mintcoin_gas;
        if tx.get_gas_amount() < required_gas {
            return Err(VerificationError::InsufficientGas {
                declared: tx.get_gas_amount(),
                required: required_gas,
            });
        }

        let payload = MintPayload::from_bytes(tx.get_message())?;
        let (mint_id, params, setting) = payload.consume();

        // state immediately before this transaction, whether it is in the
        // pool, mid-block, or being re-validated after a reorg
        let before = self
            .provider
            .get_mintcoin_state(mint_id, include_block, &tx_hash);
        self.mint_rule
            .check_transition(&before, params.as_ref(), setting.as_ref())
            .map_err(VerificationError::InvalidMintTransition)?;

        // the owner co-signs every mutation of its coin, even pure
        // parameter edits
        let (mut require_cks, coins) = self.input_output_digest(tx)?;
        if let Some(owner) = before.get_owner() {
            require_cks.insert(*owner);
        }
        require_exact_signers(&require_cks, &tx.signed_addresses())?;

        // classification is on the touched coin ids, zero entries included
        let include_coin_ids: BTreeSet<CoinId> = coins.coin_ids().collect();
        let exchange_ids: BTreeSet<CoinId> = [BASE_COIN_ID, mint_id].into_iter().collect();

        if include_coin_ids == exchange_ids && mint_id != BASE_COIN_ID {
            // supply exchange: negative mint delta issues, positive burns
            if !before.get_setting().additional_issue {
                return Err(VerificationError::MintSupplyLocked);
            }
            if coins.get(BASE_COIN_ID) + coins.get(mint_id) != 0 {
                return Err(VerificationError::MintAmountMismatch(coins));
            }
        } else if include_coin_ids.len() == 1 {
            let include_id = *include_coin_ids.iter().next().unwrap();
            if include_id == BASE_COIN_ID {
                // metadata-only update
                if params.is_none() && setting.is_none() {
                    return Err(VerificationError::EmptyMintUpdate);
                }
                if coins.get(BASE_COIN_ID) != 0 {
                    return Err(VerificationError::MintAmountMismatch(coins));
                }
            } else if include_id == mint_id {
                return Err(VerificationError::MintIdOnly(coins));
            } else {
                return Err(VerificationError::UnexpectedMintCoins(coins));
            }
        } else {
            return Err(VerificationError::UnexpectedMintCoins(coins));
        }

        debug!("mint coin {} tx {} ok", mint_id, tx_hash);
        Ok(())
    }

    /// Resolve one input to the origin output it consumes. A missing origin
    /// and an out-of-range index are the same failure: a dangling reference.
    fn resolve_origin_output(&self, input: &TxInput) -> Result<TxOutput, VerificationError> {
        let origin = self.provider.get_tx(input.get_txhash()).ok_or_else(|| {
            VerificationError::OriginNotFound {
                hash: input.get_txhash().clone(),
                index: input.get_index(),
            }
        })?;
        origin
            .get_tx()
            .get_outputs()
            .get(input.get_index() as usize)
            .cloned()
            .ok_or_else(|| VerificationError::OriginNotFound {
                hash: input.get_txhash().clone(),
                index: input.get_index(),
            })
    }

    /// Required signers and per-coin deltas of a mint transaction: inputs
    /// count positive, outputs negative, the fee comes off the base coin.
    fn input_output_digest(
        &self,
        tx: &Transaction,
    ) -> Result<(BTreeSet<Address>, Balance), VerificationError> {
        let mut require_cks = BTreeSet::new();
        let mut coins = Balance::new();

        for input in tx.get_inputs() {
            let origin = self.resolve_origin_output(input)?;
            require_cks.insert(*origin.get_address());
            coins.add(origin.get_coin_id(), origin.get_amount());
        }
        for output in tx.get_outputs() {
            coins.sub(output.get_coin_id(), output.get_amount());
        }
        // a zero fee leaves the base coin untouched, a touched-at-zero
        // entry still counts for the shape classification
        let fee = tx.get_fee();
        if fee != 0 {
            coins.add_signed(BASE_COIN_ID, -fee);
        }

        Ok((require_cks, coins))
    }
}

/// Exact-set signer comparison with a precomputed symmetric difference for
/// the rejection report.
fn require_exact_signers(
    require_cks: &BTreeSet<Address>,
    signed_cks: &BTreeSet<Address>,
) -> Result<(), VerificationError> {
    if require_cks == signed_cks {
        return Ok(());
    }
    Err(VerificationError::AuthorizationMismatch {
        lack: require_cks.difference(signed_cks).copied().collect(),
        extra: signed_cks.difference(require_cks).copied().collect(),
    })
}
