use thiserror::Error;

use crate::{
    account::Balance,
    crypto::{Address, Hash, KeyError},
    serializer::ReaderError,
    transaction::{MessageType, TransactionType},
};

/// Why a (transaction, context) pair was rejected.
///
/// One variant per failure kind, always terminal for that pair: nothing here
/// is retried or partially applied, and the same transaction may still be
/// accepted later under a different snapshot (a matured input, an edited
/// validator set).
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Input origin not found {hash}:{index}")]
    OriginNotFound { hash: Hash, index: u32 },
    #[error("Origin {origin} is unconfirmed but the transaction is included in a block")]
    PrematureInclusion { origin: Hash },
    #[error("Reward origin {origin} is immature, {height}>{limit}")]
    ImmatureReward { origin: Hash, height: u64, limit: u64 },
    #[error("Input {hash}:{index} is already spent")]
    AlreadySpent { hash: Hash, index: u32 },
    #[error("Input {hash}:{index} is already used by {by} in the same block")]
    DoubleSpendInBlock { hash: Hash, index: u32, by: Hash },
    #[error("Output {index} declares a non-positive amount")]
    NonPositiveOutput { index: usize },
    #[error("Imbalanced transaction, {remain} = {inputs} - {outputs} - {fee}")]
    ImbalancedTransaction {
        remain: Balance,
        inputs: Balance,
        outputs: Balance,
        fee: Balance,
    },
    #[error("Validator {0} is not initialized")]
    UninitializedValidator(Address),
    #[error("Validator quorum not satisfied, {signed}<{require}")]
    InsufficientValidatorSignatures { signed: usize, require: usize },
    #[error("Contract address {0} is not allowed in a plain transfer")]
    ContractAddressNotAllowed(Address),
    #[error("Unrecognized address version {version}")]
    UnrecognizedAddress { address: Address, version: u8 },
    #[error("Required signer count out of range, num={0}")]
    SignerCountOutOfRange(usize),
    #[error("Signature set mismatch, lack={lack:?} extra={extra:?}")]
    AuthorizationMismatch {
        lack: Vec<Address>,
        extra: Vec<Address>,
    },
    #[error("Failed to decode message payload: {0}")]
    PayloadDecodeError(#[from] ReaderError),
    #[error("Rejected mint coin transition: {0}")]
    InvalidMintTransition(String),
    #[error("Insufficient gas amount, {declared}<{required}")]
    InsufficientGas { declared: u64, required: u64 },

    // Mint coin structural preconditions
    #[error("Mint coin transaction needs at least one input and one output")]
    MissingInputsOrOutputs,
    #[error("Invalid message type, expected {expected:?} got {got:?}")]
    InvalidMessageType {
        expected: MessageType,
        got: MessageType,
    },
    #[error("Block index 0 is reserved for the proof transaction")]
    ReservedProofSlot,

    // Mint coin balance-shape invariants
    #[error("additional_issue is disabled but the supply changed")]
    MintSupplyLocked,
    #[error("Mint exchange amounts do not cancel out, coins={0}")]
    MintAmountMismatch(Balance),
    #[error("No params or setting update")]
    EmptyMintUpdate,
    #[error("Only the mint coin moves, coins={0}")]
    MintIdOnly(Balance),
    #[error("Unexpected coin set in a mint transaction, coins={0}")]
    UnexpectedMintCoins(Balance),

    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] KeyError),
    #[error("{0:?} transactions are produced by the block pipeline, not submitted")]
    RestrictedClass(TransactionType),
}
