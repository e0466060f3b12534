use crate::{
    config::COIN_VALUE,
    crypto::{hash, Hash, HASH_SIZE},
};
use primitive_types::U256;

/// Deterministic proof-of-stake work test, a weighted lottery proportional
/// to the staked amount.
///
/// The work value is the sha256 of `tx_hash || previous_block_hash` read as
/// a little-endian integer, divided by the stake expressed in full coins.
/// Doubling the stake halves the effective work, so eligibility is
/// monotonic in the stake for fixed hashes and target.
///
/// A stake below one full coin never wins: the divisor would be zero, and
/// rejecting zero stakes is the caller's job before it ever builds a proof.
/// All arithmetic is done on U256 to avoid overflow.
pub fn check_stake_eligibility(
    tx_hash: &Hash,
    previous_hash: &Hash,
    staked_amount: u64,
    target: &Hash,
) -> bool {
    let divisor = staked_amount / COIN_VALUE;
    if divisor == 0 {
        return false;
    }

    let mut seed = Vec::with_capacity(HASH_SIZE * 2);
    seed.extend_from_slice(tx_hash.as_bytes());
    seed.extend_from_slice(previous_hash.as_bytes());
    let digest = hash(&seed);

    let work = U256::from_little_endian(digest.as_bytes()) / U256::from(divisor);
    work < U256::from_little_endian(target.as_bytes())
}
