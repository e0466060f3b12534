use crate::{
    crypto::Address,
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};

/// Membership operation of a validator edit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorOp {
    /// Threshold-only edit.
    Nop,
    /// Add the named member.
    Add,
    /// Remove the named member.
    Remove,
}

impl Serializer for ValidatorOp {
    fn write(&self, writer: &mut Writer) {
        let tag = match self {
            ValidatorOp::Nop => 0u8,
            ValidatorOp::Add => 1,
            ValidatorOp::Remove => 2,
        };
        writer.write_u8(tag);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => ValidatorOp::Nop,
            1 => ValidatorOp::Add,
            2 => ValidatorOp::Remove,
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1
    }
}

/// Message payload of a validator edit transaction: one membership change
/// and/or a threshold adjustment for a validator address.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidatorEditPayload {
    /// The validator address being edited.
    validator: Address,
    /// Member added or removed, absent for a threshold-only edit.
    member: Option<Address>,
    op: ValidatorOp,
    /// Signed adjustment of the signature threshold.
    require_diff: i8,
}

impl ValidatorEditPayload {
    pub fn new(validator: Address, member: Option<Address>, op: ValidatorOp, require_diff: i8) -> Self {
        Self {
            validator,
            member,
            op,
            require_diff,
        }
    }

    pub fn get_validator(&self) -> &Address {
        &self.validator
    }

    pub fn get_member(&self) -> Option<&Address> {
        self.member.as_ref()
    }

    pub fn get_op(&self) -> ValidatorOp {
        self.op
    }

    pub fn is_removal(&self) -> bool {
        self.op == ValidatorOp::Remove
    }

    pub fn get_require_diff(&self) -> i8 {
        self.require_diff
    }
}

impl Serializer for ValidatorEditPayload {
    fn write(&self, writer: &mut Writer) {
        self.validator.write(writer);
        self.member.write(writer);
        self.op.write(writer);
        writer.write_u8(self.require_diff as u8);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            validator: Address::read(reader)?,
            member: Option::read(reader)?,
            op: ValidatorOp::read(reader)?,
            require_diff: reader.read_u8()? as i8,
        })
    }

    fn size(&self) -> usize {
        self.validator.size() + self.member.size() + 1 + 1
    }
}
