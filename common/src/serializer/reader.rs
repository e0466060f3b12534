use thiserror::Error;

use crate::crypto::{Hash, HASH_SIZE};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Not enough bytes left to read")]
    InvalidSize,
    #[error("Invalid value encountered while decoding")]
    InvalidValue,
    #[error("Invalid hex string")]
    InvalidHex,
    #[error("Invalid UTF-8 string")]
    InvalidString,
}

/// Cursor over a byte slice, advancing as values are decoded.
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, total: 0 }
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        if self.remaining() < count {
            return Err(ReaderError::InvalidSize);
        }
        let bytes = &self.bytes[self.total..self.total + count];
        self.total += count;
        Ok(bytes)
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes(bytes.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_be_bytes(bytes.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_hash(&mut self) -> Result<Hash, ReaderError> {
        let bytes = self.read_bytes(HASH_SIZE)?;
        let bytes: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| ReaderError::InvalidSize)?;
        Ok(Hash::new(bytes))
    }

    // Length-prefixed UTF-8, max 255 bytes
    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidString)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.total
    }

    pub fn total_read(&self) -> usize {
        self.total
    }
}
