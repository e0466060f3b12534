use crate::{
    crypto::{Address, Hash},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};

use super::CoinId;

/// Application-defined fields of a mint coin. Every field is optional: an
/// amendment only carries the fields it changes, and the snapshot merges
/// them over the previous values field by field.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MintParams {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub digit: Option<u8>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Owner address. The owner co-signs every mutation of the coin.
    pub address: Option<Address>,
}

impl MintParams {
    /// Merge an amendment over this value, field by field.
    pub fn merge(&mut self, update: &MintParams) {
        if update.name.is_some() {
            self.name = update.name.clone();
        }
        if update.unit.is_some() {
            self.unit = update.unit.clone();
        }
        if update.digit.is_some() {
            self.digit = update.digit;
        }
        if update.description.is_some() {
            self.description = update.description.clone();
        }
        if update.image.is_some() {
            self.image = update.image.clone();
        }
        if update.address.is_some() {
            self.address = update.address;
        }
    }
}

impl Serializer for MintParams {
    fn write(&self, writer: &mut Writer) {
        self.name.write(writer);
        self.unit.write(writer);
        self.digit.write(writer);
        self.description.write(writer);
        self.image.write(writer);
        self.address.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            name: Option::read(reader)?,
            unit: Option::read(reader)?,
            digit: Option::read(reader)?,
            description: Option::read(reader)?,
            image: Option::read(reader)?,
            address: Option::read(reader)?,
        })
    }

    fn size(&self) -> usize {
        self.name.size()
            + self.unit.size()
            + self.digit.size()
            + self.description.size()
            + self.image.size()
            + self.address.size()
    }
}

/// Governance flags of a mint coin.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintSetting {
    /// Supply may still be changed after issuance.
    pub additional_issue: bool,
    /// Ownership may still be transferred.
    pub change_address: bool,
}

impl Default for MintSetting {
    // Template for a freshly issued coin: everything still open
    fn default() -> Self {
        Self {
            additional_issue: true,
            change_address: true,
        }
    }
}

impl Serializer for MintSetting {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(self.additional_issue);
        writer.write_bool(self.change_address);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            additional_issue: reader.read_bool()?,
            change_address: reader.read_bool()?,
        })
    }

    fn size(&self) -> usize {
        2
    }
}

/// Point-in-time snapshot of a mint coin.
///
/// Like validator snapshots, this is never a live mutable object: it is the
/// fold of the accepted mint transactions for the coin id up to a stop
/// point. The uninitialized sentinel (version -1) has no owner and the
/// template setting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintCoinState {
    coin_id: CoinId,
    /// Accepted mint transaction count for this coin, -1 before issuance.
    version: i32,
    params: MintParams,
    setting: MintSetting,
    /// Hash of the last mint transaction folded in, if any.
    last_update: Option<Hash>,
}

impl MintCoinState {
    /// The uninitialized sentinel for a coin id.
    pub fn uninitialized(coin_id: CoinId) -> Self {
        Self {
            coin_id,
            version: -1,
            params: MintParams::default(),
            setting: MintSetting::default(),
            last_update: None,
        }
    }

    pub fn get_coin_id(&self) -> CoinId {
        self.coin_id
    }

    pub fn get_version(&self) -> i32 {
        self.version
    }

    pub fn is_initialized(&self) -> bool {
        self.version >= 0
    }

    pub fn get_params(&self) -> &MintParams {
        &self.params
    }

    pub fn get_setting(&self) -> &MintSetting {
        &self.setting
    }

    pub fn get_owner(&self) -> Option<&Address> {
        self.params.address.as_ref()
    }

    pub fn get_last_update(&self) -> Option<&Hash> {
        self.last_update.as_ref()
    }

    /// Fold one accepted mint transaction into the snapshot, keyed by the
    /// authorizing transaction hash. Params merge field by field, an
    /// omitted setting keeps the previous one.
    pub fn apply(
        &mut self,
        tx_hash: Hash,
        params: Option<&MintParams>,
        setting: Option<&MintSetting>,
    ) {
        if let Some(params) = params {
            self.params.merge(params);
        }
        if let Some(setting) = setting {
            self.setting = *setting;
        }
        self.version += 1;
        self.last_update = Some(tx_hash);
    }

    /// Reconstruct a snapshot from an ordered update log.
    pub fn reconstruct<'a, I>(coin_id: CoinId, updates: I) -> Self
    where
        I: IntoIterator<Item = (Hash, Option<&'a MintParams>, Option<&'a MintSetting>)>,
    {
        let mut state = Self::uninitialized(coin_id);
        for (tx_hash, params, setting) in updates {
            state.apply(tx_hash, params, setting);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash;

    fn issue_params(owner: Address) -> MintParams {
        MintParams {
            name: Some("Maple".to_string()),
            unit: Some("MPL".to_string()),
            digit: Some(8),
            description: None,
            image: None,
            address: Some(owner),
        }
    }

    #[test]
    fn test_sentinel_has_no_owner() {
        let state = MintCoinState::uninitialized(5);
        assert_eq!(state.get_version(), -1);
        assert!(!state.is_initialized());
        assert!(state.get_owner().is_none());
    }

    #[test]
    fn test_apply_merges_params() {
        let owner = Address::normal([1u8; 20]);
        let mut state = MintCoinState::uninitialized(5);
        state.apply(hash(b"issue"), Some(&issue_params(owner)), None);
        assert_eq!(state.get_version(), 0);
        assert_eq!(state.get_owner(), Some(&owner));
        assert_eq!(state.get_params().name.as_deref(), Some("Maple"));

        // amendment only touching the description
        let update = MintParams {
            description: Some("autumn token".to_string()),
            ..Default::default()
        };
        state.apply(hash(b"amend"), Some(&update), None);
        assert_eq!(state.get_version(), 1);
        assert_eq!(state.get_params().name.as_deref(), Some("Maple"));
        assert_eq!(state.get_params().description.as_deref(), Some("autumn token"));
        assert_eq!(state.get_last_update(), Some(&hash(b"amend")));
    }

    #[test]
    fn test_reconstruct_is_idempotent() {
        let owner = Address::normal([2u8; 20]);
        let params = issue_params(owner);
        let closed = MintSetting {
            additional_issue: false,
            change_address: true,
        };
        let log = vec![
            (hash(b"a"), Some(&params), None),
            (hash(b"b"), None, Some(&closed)),
        ];

        let first = MintCoinState::reconstruct(9, log.clone());
        let second = MintCoinState::reconstruct(9, log);
        assert_eq!(first, second);
        assert_eq!(first.get_version(), 1);
        assert!(!first.get_setting().additional_issue);
    }
}
