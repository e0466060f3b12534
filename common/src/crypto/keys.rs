use crate::{
    crypto::{hash, Address, Hash, KEY_HASH_SIZE},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a signature in bytes.
pub const SIGNATURE_SIZE: usize = SIGNATURE_LENGTH;

#[derive(Error, Debug, Clone)]
pub enum KeyError {
    #[error("Failed to parse public key bytes")]
    InvalidPublicKey,
    #[error("Invalid signature length: expected {SIGNATURE_SIZE}, got {0}")]
    InvalidSignatureLength(usize),
    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Ed25519 public key identifying a transaction signer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Derive the normal-version address of this key: the first 20 bytes of
    /// its sha256 digest under the normal tag.
    pub fn to_address(&self) -> Address {
        let digest = hash(&self.0);
        let mut key_hash = [0u8; KEY_HASH_SIZE];
        key_hash.copy_from_slice(&digest.as_bytes()[..KEY_HASH_SIZE]);
        Address::normal(key_hash)
    }

    /// Verify a signature over a message hash.
    pub fn verify(&self, message: &Hash, signature: &Signature) -> Result<(), KeyError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| KeyError::InvalidPublicKey)?;
        let signature = DalekSignature::from_bytes(&signature.0);
        key.verify(message.as_bytes(), &signature)
            .map_err(|_| KeyError::VerificationFailed)
    }
}

impl Serializer for PublicKey {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let bytes = reader.read_bytes(PUBLIC_KEY_SIZE)?;
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ReaderError::InvalidSize)?;
        Ok(PublicKey(bytes))
    }

    fn size(&self) -> usize {
        PUBLIC_KEY_SIZE
    }
}

/// Ed25519 signature over a transaction signing hash.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_SIZE] = slice
            .try_into()
            .map_err(|_| KeyError::InvalidSignatureLength(slice.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serializer for Signature {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let bytes = reader.read_bytes(SIGNATURE_SIZE)?;
        let bytes: [u8; SIGNATURE_SIZE] =
            bytes.try_into().map_err(|_| ReaderError::InvalidSize)?;
        Ok(Signature(bytes))
    }

    fn size(&self) -> usize {
        SIGNATURE_SIZE
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        let bytes = hex::decode(hex).map_err(serde::de::Error::custom)?;
        Signature::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Signing keypair. The secret half is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    secret: [u8; SECRET_KEY_LENGTH],
}

impl KeyPair {
    pub fn new() -> Self {
        let signing = SigningKey::generate(&mut OsRng);
        Self {
            secret: signing.to_bytes(),
        }
    }

    pub fn from_secret(secret: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self { secret }
    }

    pub fn get_public_key(&self) -> PublicKey {
        let signing = SigningKey::from_bytes(&self.secret);
        PublicKey(signing.verifying_key().to_bytes())
    }

    pub fn get_address(&self) -> Address {
        self.get_public_key().to_address()
    }

    /// Sign a message hash.
    pub fn sign(&self, message: &Hash) -> Signature {
        let signing = SigningKey::from_bytes(&self.secret);
        Signature(signing.sign(message.as_bytes()).to_bytes())
    }
}

impl Default for KeyPair {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
