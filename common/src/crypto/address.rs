use crate::{
    crypto::bech32::{self, Bech32Error},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};
use thiserror::Error;

// Human readable part of every encoded address
pub const ADDRESS_PREFIX: &str = "mmj";
// Version byte + key hash
pub const ADDRESS_PAYLOAD_SIZE: usize = 21;
pub const KEY_HASH_SIZE: usize = 20;

/// Recognized address version tags.
///
/// The version decides the authorization semantics of funds held by the
/// address: a plain key, a validator quorum, or a contract. Unknown tags are
/// carried verbatim by `Address` and rejected at authorization time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddressVersion {
    Normal,
    Validator,
    Contract,
}

impl AddressVersion {
    pub fn as_byte(self) -> u8 {
        match self {
            AddressVersion::Normal => 0,
            AddressVersion::Validator => 1,
            AddressVersion::Contract => 2,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(AddressVersion::Normal),
            1 => Some(AddressVersion::Validator),
            2 => Some(AddressVersion::Contract),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid human readable part, expected '{ADDRESS_PREFIX}'")]
    InvalidPrefix,
    #[error("Invalid address payload size")]
    InvalidPayload,
    #[error(transparent)]
    Bech32(#[from] Bech32Error),
}

/// Versioned account identifier: a version tag plus a 20-byte key hash.
///
/// The tag is part of the encoded form, so the same key hash under two
/// versions is two distinct addresses with distinct spending rules.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Address {
    version: u8,
    key_hash: [u8; KEY_HASH_SIZE],
}

impl Address {
    pub fn new(version: AddressVersion, key_hash: [u8; KEY_HASH_SIZE]) -> Self {
        Self {
            version: version.as_byte(),
            key_hash,
        }
    }

    // Addresses decoded from the wire keep whatever tag they carried
    pub fn from_raw(version: u8, key_hash: [u8; KEY_HASH_SIZE]) -> Self {
        Self { version, key_hash }
    }

    pub fn normal(key_hash: [u8; KEY_HASH_SIZE]) -> Self {
        Self::new(AddressVersion::Normal, key_hash)
    }

    pub fn validator(key_hash: [u8; KEY_HASH_SIZE]) -> Self {
        Self::new(AddressVersion::Validator, key_hash)
    }

    pub fn contract(key_hash: [u8; KEY_HASH_SIZE]) -> Self {
        Self::new(AddressVersion::Contract, key_hash)
    }

    pub fn get_version(&self) -> Option<AddressVersion> {
        AddressVersion::from_byte(self.version)
    }

    pub fn get_version_byte(&self) -> u8 {
        self.version
    }

    pub fn get_key_hash(&self) -> &[u8; KEY_HASH_SIZE] {
        &self.key_hash
    }

    pub fn is_normal(&self) -> bool {
        self.get_version() == Some(AddressVersion::Normal)
    }
}

impl Serializer for Address {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.version);
        writer.write_bytes(&self.key_hash);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let version = reader.read_u8()?;
        let bytes = reader.read_bytes(KEY_HASH_SIZE)?;
        let key_hash: [u8; KEY_HASH_SIZE] =
            bytes.try_into().map_err(|_| ReaderError::InvalidSize)?;
        Ok(Address::from_raw(version, key_hash))
    }

    fn size(&self) -> usize {
        ADDRESS_PAYLOAD_SIZE
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data) = bech32::decode(s)?;
        if hrp != ADDRESS_PREFIX {
            return Err(AddressError::InvalidPrefix);
        }

        let bytes = bech32::convert_bits(&data, 5, 8, false)?;
        if bytes.len() != ADDRESS_PAYLOAD_SIZE {
            return Err(AddressError::InvalidPayload);
        }

        let key_hash: [u8; KEY_HASH_SIZE] = bytes[1..]
            .try_into()
            .map_err(|_| AddressError::InvalidPayload)?;
        Ok(Address::from_raw(bytes[0], key_hash))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_SIZE);
        payload.push(self.version);
        payload.extend_from_slice(&self.key_hash);

        // payload size is fixed, both calls are infallible
        let data = bech32::convert_bits(&payload, 8, 5, true).map_err(|_| Error)?;
        let encoded = bech32::encode(ADDRESS_PREFIX, &data).map_err(|_| Error)?;
        write!(f, "{}", encoded)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let encoded = String::deserialize(deserializer)?;
        Address::from_str(&encoded).map_err(SerdeError::custom)
    }
}
