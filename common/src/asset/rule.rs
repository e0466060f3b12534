use super::{MintCoinState, MintParams, MintSetting};

// Decimal places are capped so amounts stay within minor-unit arithmetic
const MAX_DIGIT: u8 = 8;

/// Legality of a single mint coin transition, separated from the verifier.
///
/// Which fields may change between first issuance and a later amendment is
/// chain policy, not consensus plumbing, so the verifier takes any rule
/// object and surfaces its reason string verbatim on rejection.
pub trait MintRule {
    /// Check one proposed transition from `before` under the new params and
    /// setting. A returned string is the rejection reason.
    fn check_transition(
        &self,
        before: &MintCoinState,
        params: Option<&MintParams>,
        setting: Option<&MintSetting>,
    ) -> Result<(), String>;
}

/// Default transition rules.
///
/// First issuance must fully describe the coin and name its owner.
/// Amendments can never change the decimal digit, can only move ownership
/// while `change_address` holds, and can never re-open a closed supply.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMintRule;

impl MintRule for StandardMintRule {
    fn check_transition(
        &self,
        before: &MintCoinState,
        params: Option<&MintParams>,
        setting: Option<&MintSetting>,
    ) -> Result<(), String> {
        if let Some(params) = params {
            if let Some(digit) = params.digit {
                if digit > MAX_DIGIT {
                    return Err(format!("digit is over limit {}>{}", digit, MAX_DIGIT));
                }
            }
        }

        if !before.is_initialized() {
            let params = match params {
                Some(params) => params,
                None => return Err("params is required on first issue".to_string()),
            };
            if params.name.is_none() {
                return Err("name is required on first issue".to_string());
            }
            if params.unit.is_none() {
                return Err("unit is required on first issue".to_string());
            }
            if params.digit.is_none() {
                return Err("digit is required on first issue".to_string());
            }
            if params.address.is_none() {
                return Err("owner address is required on first issue".to_string());
            }
            return Ok(());
        }

        // amendment of an already issued coin
        if let Some(params) = params {
            if params.digit.is_some() && params.digit != before.get_params().digit {
                return Err("digit is fixed after issue".to_string());
            }
            if params.address.is_some()
                && params.address.as_ref() != before.get_owner()
                && !before.get_setting().change_address
            {
                return Err("change_address is disabled".to_string());
            }
        }

        if let Some(setting) = setting {
            if setting.additional_issue && !before.get_setting().additional_issue {
                return Err("additional_issue cannot be re-enabled".to_string());
            }
        }

        Ok(())
    }
}
