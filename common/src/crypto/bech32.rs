use thiserror::Error;

// bech32 character set for the data part
const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
// Separator between the human readable part and the data part
const SEPARATOR: char = '1';
const CHECKSUM_LEN: usize = 6;
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    #[error("Invalid human readable part")]
    InvalidHrp,
    #[error("Missing separator character")]
    MissingSeparator,
    #[error("Invalid character '{0}' in data part")]
    InvalidCharacter(char),
    #[error("Mixed case strings are not accepted")]
    MixedCase,
    #[error("Checksum verification failed")]
    InvalidChecksum,
    #[error("Data part is too short")]
    TooShort,
    #[error("Invalid bit group conversion from {from} to {to}")]
    InvalidBits { from: u32, to: u32 },
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (*value as u32);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut expanded = Vec::with_capacity(bytes.len() * 2 + 1);
    for b in bytes {
        expanded.push(b >> 5);
    }
    expanded.push(0);
    for b in bytes {
        expanded.push(b & 0x1f);
    }
    expanded
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == 1
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; CHECKSUM_LEN]);
    let polymod = polymod(&values) ^ 1;

    let mut checksum = [0; CHECKSUM_LEN];
    for (i, value) in checksum.iter_mut().enumerate() {
        *value = ((polymod >> (5 * (5 - i))) & 0x1f) as u8;
    }
    checksum
}

/// Regroup a byte stream between bit widths (8 -> 5 for encoding, 5 -> 8
/// for decoding). Padding is only legal when widening the groups.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Bech32Error> {
    if from > 8 || to > 8 {
        return Err(Bech32Error::InvalidBits { from, to });
    }

    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::new();
    let max = (1u32 << to) - 1;

    for value in data {
        let value = *value as u32;
        if value >> from != 0 {
            return Err(Bech32Error::InvalidBits { from, to });
        }
        acc = (acc << from) | value;
        bits += from;
        while bits >= to {
            bits -= to;
            result.push(((acc >> bits) & max) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return Err(Bech32Error::InvalidBits { from, to });
    }

    Ok(result)
}

/// Encode 5-bit groups with the given human readable part.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, Bech32Error> {
    if hrp.is_empty() || !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(Bech32Error::InvalidHrp);
    }

    let checksum = create_checksum(hrp, data);
    let mut encoded = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    encoded.push_str(hrp);
    encoded.push(SEPARATOR);
    for value in data.iter().chain(checksum.iter()) {
        encoded.push(CHARSET[*value as usize] as char);
    }
    Ok(encoded)
}

/// Decode a bech32 string into its human readable part and 5-bit groups.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), Bech32Error> {
    let has_lower = encoded.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = encoded.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Bech32Error::MixedCase);
    }
    let encoded = encoded.to_lowercase();

    let pos = encoded.rfind(SEPARATOR).ok_or(Bech32Error::MissingSeparator)?;
    if pos == 0 || pos + CHECKSUM_LEN + 1 > encoded.len() {
        return Err(Bech32Error::TooShort);
    }

    let hrp = &encoded[..pos];
    let mut data = Vec::with_capacity(encoded.len() - pos - 1);
    for c in encoded[pos + 1..].chars() {
        let index = CHARSET
            .iter()
            .position(|b| *b as char == c)
            .ok_or(Bech32Error::InvalidCharacter(c))?;
        data.push(index as u8);
    }

    if !verify_checksum(hrp, &data) {
        return Err(Bech32Error::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_owned(), data))
}
