use crate::asset::CoinId;

// 8 decimals numbers
pub const COIN_DECIMALS: u8 = 8;
// 100 000 000 to represent 1 full coin
pub const COIN_VALUE: u64 = 10u64.pow(COIN_DECIMALS as u32);

// Base network asset, always coin id 0
// Mint coins are registered with a nonzero id
pub const BASE_COIN_ID: CoinId = 0;

// Reward outputs (PoW/PoS proof transactions) must age past this many
// confirmations before they are spendable
// A reorg can invalidate a recent proof transaction together with its reward
pub const MATURE_HEIGHT: u64 = 20;

// Gas charged per collected signature on a transaction
pub const SIGNATURE_GAS: u64 = 10_000;
// Flat gas charged for a mint coin issuance or amendment
// High on purpose: minting is a chain-wide registry write
pub const MINTCOIN_GAS: u64 = 10_000_000;

// A transaction must resolve to at least one required signer
// and never to 256 or more
pub const MAX_REQUIRED_SIGNERS: usize = 255;

/// Chain parameters handed to every verifier at construction.
///
/// Validation never reads process-wide mutable state: a caller builds one
/// `ChainParams` from its network configuration and shares it freely, so two
/// verifiers with different parameters can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainParams {
    /// Maturity window for reward-origin outputs, in blocks.
    pub mature_height: u64,
    /// Gas charged per collected signature.
    pub signature_gas: u64,
    /// Flat gas for a mint coin transaction.
    pub mintcoin_gas: u64,
    /// Coin the declared fee is paid in, normally the base asset.
    pub fee_coin_id: CoinId,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            mature_height: MATURE_HEIGHT,
            signature_gas: SIGNATURE_GAS,
            mintcoin_gas: MINTCOIN_GAS,
            fee_coin_id: BASE_COIN_ID,
        }
    }
}
