use crate::{
    asset::{CoinId, MintParams, MintSetting},
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};

/// Message payload of a mint coin transaction: the targeted coin id plus
/// the proposed params and setting.
///
/// Presence is type level: `params: None` and `Some(params)` are different
/// wire encodings, and the no-op check in the verifier ("both absent") is a
/// match on these options, never a sentinel value.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MintPayload {
    mint_id: CoinId,
    params: Option<MintParams>,
    setting: Option<MintSetting>,
}

impl MintPayload {
    pub fn new(mint_id: CoinId, params: Option<MintParams>, setting: Option<MintSetting>) -> Self {
        Self {
            mint_id,
            params,
            setting,
        }
    }

    pub fn get_mint_id(&self) -> CoinId {
        self.mint_id
    }

    pub fn get_params(&self) -> Option<&MintParams> {
        self.params.as_ref()
    }

    pub fn get_setting(&self) -> Option<&MintSetting> {
        self.setting.as_ref()
    }

    pub fn consume(self) -> (CoinId, Option<MintParams>, Option<MintSetting>) {
        (self.mint_id, self.params, self.setting)
    }
}

impl Serializer for MintPayload {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self.mint_id);
        self.params.write(writer);
        self.setting.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            mint_id: reader.read_u32()?,
            params: Option::read(reader)?,
            setting: Option::read(reader)?,
        })
    }

    fn size(&self) -> usize {
        4 + self.params.size() + self.setting.size()
    }
}
