use serde::{Deserialize, Serialize};

use crate::{
    asset::CoinId,
    crypto::{hash, Address, Hash, Hashable, KeyError, PublicKey, Signature},
    serializer::*,
};
use std::collections::BTreeSet;

pub mod verify;

mod payload;

pub use payload::*;


// Maximum number of inputs, outputs and collected signatures per transaction
pub const MAX_ITEM_COUNT: usize = 255;
// Maximum size of the opaque message payload
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// Transaction class. The tag decides which validation path a transaction
/// takes and whether its outputs are subject to the reward maturity window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Genesis,
    PowReward,
    PosReward,
    Transfer,
    MintCoin,
    ValidatorEdit,
}

impl TransactionType {
    /// Reward outputs must mature before they are spendable.
    pub fn is_reward(&self) -> bool {
        matches!(self, TransactionType::PowReward | TransactionType::PosReward)
    }
}

impl Serializer for TransactionType {
    fn write(&self, writer: &mut Writer) {
        let tag = match self {
            TransactionType::Genesis => 0u8,
            TransactionType::PowReward => 1,
            TransactionType::PosReward => 2,
            TransactionType::Transfer => 3,
            TransactionType::MintCoin => 4,
            TransactionType::ValidatorEdit => 8,
        };
        writer.write_u8(tag);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => TransactionType::Genesis,
            1 => TransactionType::PowReward,
            2 => TransactionType::PosReward,
            3 => TransactionType::Transfer,
            4 => TransactionType::MintCoin,
            8 => TransactionType::ValidatorEdit,
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1
    }
}

/// Declared interpretation of the opaque message payload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    None,
    Plain,
    Binary,
}

impl Serializer for MessageType {
    fn write(&self, writer: &mut Writer) {
        let tag = match self {
            MessageType::None => 0u8,
            MessageType::Plain => 1,
            MessageType::Binary => 2,
        };
        writer.write_u8(tag);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => MessageType::None,
            1 => MessageType::Plain,
            2 => MessageType::Binary,
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1
    }
}

/// Reference to an origin output: the producing transaction's hash and the
/// output position inside it. A reference, not an owned value — it is
/// resolved lazily against the transaction store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxInput {
    txhash: Hash,
    index: u32,
}

impl TxInput {
    pub fn new(txhash: Hash, index: u32) -> Self {
        Self { txhash, index }
    }

    pub fn get_txhash(&self) -> &Hash {
        &self.txhash
    }

    pub fn get_index(&self) -> u32 {
        self.index
    }
}

impl Serializer for TxInput {
    fn write(&self, writer: &mut Writer) {
        writer.write_hash(&self.txhash);
        writer.write_u32(self.index);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            txhash: reader.read_hash()?,
            index: reader.read_u32()?,
        })
    }

    fn size(&self) -> usize {
        self.txhash.size() + 4
    }
}

/// One produced output: who receives, which coin, how much.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    address: Address,
    coin_id: CoinId,
    amount: u64,
}

impl TxOutput {
    pub fn new(address: Address, coin_id: CoinId, amount: u64) -> Self {
        Self {
            address,
            coin_id,
            amount,
        }
    }

    pub fn get_address(&self) -> &Address {
        &self.address
    }

    pub fn get_coin_id(&self) -> CoinId {
        self.coin_id
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }
}

impl Serializer for TxOutput {
    fn write(&self, writer: &mut Writer) {
        self.address.write(writer);
        writer.write_u32(self.coin_id);
        writer.write_u64(self.amount);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            address: Address::read(reader)?,
            coin_id: reader.read_u32()?,
            amount: reader.read_u64()?,
        })
    }

    fn size(&self) -> usize {
        self.address.size() + 4 + 8
    }
}

/// One collected signature: the signing key and its signature over the
/// transaction hash. The signer's address is the normal-version address of
/// the key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxSignature {
    public_key: PublicKey,
    signature: Signature,
}

impl TxSignature {
    pub fn new(public_key: PublicKey, signature: Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    pub fn get_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn get_signature(&self) -> &Signature {
        &self.signature
    }

    pub fn get_signer(&self) -> Address {
        self.public_key.to_address()
    }
}

impl Serializer for TxSignature {
    fn write(&self, writer: &mut Writer) {
        self.public_key.write(writer);
        self.signature.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            public_key: PublicKey::read(reader)?,
            signature: Signature::read(reader)?,
        })
    }

    fn size(&self) -> usize {
        self.public_key.size() + self.signature.size()
    }
}

/// A transaction as validated by this crate.
///
/// The content hash covers everything except the collected signature list,
/// so the identifier is stable while signatures are gathered, and every
/// signature signs that same hash.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Transaction {
    /// Class of the transaction
    tx_type: TransactionType,
    /// Declared interpretation of `message`
    message_type: MessageType,
    /// Opaque payload, decoded per class (mint coin, validator edit)
    message: Vec<u8>,
    /// Origin references consumed by this transaction
    inputs: Vec<TxInput>,
    /// Outputs produced by this transaction
    outputs: Vec<TxOutput>,
    /// Fee price per gas unit
    gas_price: u64,
    /// Declared fee budget in gas units
    gas_amount: u64,
    /// Collected signatures over the content hash
    signatures: Vec<TxSignature>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tx_type: TransactionType,
        message_type: MessageType,
        message: Vec<u8>,
        inputs: Vec<TxInput>,
        outputs: Vec<TxOutput>,
        gas_price: u64,
        gas_amount: u64,
    ) -> Self {
        Self {
            tx_type,
            message_type,
            message,
            inputs,
            outputs,
            gas_price,
            gas_amount,
            signatures: Vec::new(),
        }
    }

    pub fn get_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn get_message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn get_message(&self) -> &[u8] {
        &self.message
    }

    pub fn get_inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    pub fn get_outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    pub fn get_gas_price(&self) -> u64 {
        self.gas_price
    }

    pub fn get_gas_amount(&self) -> u64 {
        self.gas_amount
    }

    pub fn get_signatures(&self) -> &[TxSignature] {
        &self.signatures
    }

    /// Declared fee, accumulated in i128 so the product cannot overflow.
    pub fn get_fee(&self) -> i128 {
        self.gas_price as i128 * self.gas_amount as i128
    }

    /// Append one collected signature. The content hash is unaffected.
    pub fn append_signature(&mut self, signature: TxSignature) {
        self.signatures.push(signature);
    }

    /// Deduplicated set of addresses that provided a signature.
    pub fn signed_addresses(&self) -> BTreeSet<Address> {
        self.signatures
            .iter()
            .map(TxSignature::get_signer)
            .collect()
    }

    /// Verify every collected signature against the content hash.
    pub fn verify_signatures(&self) -> Result<(), KeyError> {
        let tx_hash = self.hash();
        for signature in &self.signatures {
            signature
                .get_public_key()
                .verify(&tx_hash, signature.get_signature())?;
        }
        Ok(())
    }

    /// The bytes the content hash and every signature commit to: the full
    /// encoding minus the signature list.
    pub fn get_signing_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer);

        self.tx_type.write(&mut writer);
        self.message_type.write(&mut writer);
        writer.write_u16(self.message.len() as u16);
        writer.write_bytes(&self.message);
        writer.write_u8(self.inputs.len() as u8);
        for input in &self.inputs {
            input.write(&mut writer);
        }
        writer.write_u8(self.outputs.len() as u8);
        for output in &self.outputs {
            output.write(&mut writer);
        }
        writer.write_u64(self.gas_price);
        writer.write_u64(self.gas_amount);

        buffer
    }
}

impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        self.tx_type.write(writer);
        self.message_type.write(writer);
        writer.write_u16(self.message.len() as u16);
        writer.write_bytes(&self.message);

        writer.write_u8(self.inputs.len() as u8);
        for input in &self.inputs {
            input.write(writer);
        }

        writer.write_u8(self.outputs.len() as u8);
        for output in &self.outputs {
            output.write(writer);
        }

        writer.write_u64(self.gas_price);
        writer.write_u64(self.gas_amount);

        writer.write_u8(self.signatures.len() as u8);
        for signature in &self.signatures {
            signature.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Transaction, ReaderError> {
        let tx_type = TransactionType::read(reader)?;
        let message_type = MessageType::read(reader)?;

        let message_len = reader.read_u16()? as usize;
        if message_len > MAX_MESSAGE_SIZE {
            return Err(ReaderError::InvalidSize);
        }
        let message = reader.read_bytes(message_len)?.to_vec();

        let inputs_count = reader.read_u8()? as usize;
        let mut inputs = Vec::with_capacity(inputs_count);
        for _ in 0..inputs_count {
            inputs.push(TxInput::read(reader)?);
        }

        let outputs_count = reader.read_u8()? as usize;
        let mut outputs = Vec::with_capacity(outputs_count);
        for _ in 0..outputs_count {
            outputs.push(TxOutput::read(reader)?);
        }

        let gas_price = reader.read_u64()?;
        let gas_amount = reader.read_u64()?;

        let signatures_count = reader.read_u8()? as usize;
        let mut signatures = Vec::with_capacity(signatures_count);
        for _ in 0..signatures_count {
            signatures.push(TxSignature::read(reader)?);
        }

        Ok(Transaction {
            tx_type,
            message_type,
            message,
            inputs,
            outputs,
            gas_price,
            gas_amount,
            signatures,
        })
    }

    fn size(&self) -> usize {
        // type + message type + message length prefix
        let mut size = 1 + 1 + 2 + self.message.len()
            // inputs count byte
            + 1
            + self.inputs.iter().map(|i| i.size()).sum::<usize>()
            // outputs count byte
            + 1
            + self.outputs.iter().map(|o| o.size()).sum::<usize>()
            + 8
            + 8;

        // signatures count byte
        size += 1 + self.signatures.iter().map(|s| s.size()).sum::<usize>();
        size
    }
}

impl Hashable for Transaction {
    // The identifier must stay stable while signatures are collected
    fn hash(&self) -> Hash {
        hash(&self.get_signing_bytes())
    }
}

impl AsRef<Transaction> for Transaction {
    fn as_ref(&self) -> &Transaction {
        self
    }
}
