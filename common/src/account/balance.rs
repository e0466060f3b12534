use crate::asset::CoinId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error, Formatter},
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Sparse multi-asset signed accumulator.
///
/// Every value-accounting rule in the verifier is expressed on this type, so
/// the conservation checks read exactly like the invariants they assert. A
/// coin id stays present once touched, even when its amount returns to zero:
/// the mint-coin balance-shape classification is defined on the set of
/// *touched* coin ids, not on the nonzero ones.
///
/// Amounts are accumulated in i128 so that no sum of u64 outputs and fees
/// can overflow the accumulator.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Balance(IndexMap<CoinId, i128>);

impl Balance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry balance, the fee operand shape.
    pub fn with(coin_id: CoinId, amount: i128) -> Self {
        let mut balance = Self::new();
        balance.add_signed(coin_id, amount);
        balance
    }

    pub fn add(&mut self, coin_id: CoinId, amount: u64) {
        self.add_signed(coin_id, amount as i128);
    }

    pub fn sub(&mut self, coin_id: CoinId, amount: u64) {
        self.add_signed(coin_id, -(amount as i128));
    }

    pub fn add_signed(&mut self, coin_id: CoinId, amount: i128) {
        *self.0.entry(coin_id).or_insert(0) += amount;
    }

    /// Amount for a coin id, zero when never touched.
    pub fn get(&self, coin_id: CoinId) -> i128 {
        self.0.get(&coin_id).copied().unwrap_or(0)
    }

    /// Whether the coin id has been touched, regardless of its amount.
    pub fn contains(&self, coin_id: CoinId) -> bool {
        self.0.contains_key(&coin_id)
    }

    /// Touched coin ids, in touch order.
    pub fn coin_ids(&self) -> impl Iterator<Item = CoinId> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CoinId, i128)> + '_ {
        self.0.iter().map(|(coin_id, amount)| (*coin_id, *amount))
    }

    /// All amounts are exactly zero.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|amount| *amount == 0)
    }

    pub fn all_nonnegative(&self) -> bool {
        self.0.values().all(|amount| *amount >= 0)
    }

    pub fn all_nonpositive(&self) -> bool {
        self.0.values().all(|amount| *amount <= 0)
    }
}

impl AddAssign<&Balance> for Balance {
    fn add_assign(&mut self, other: &Balance) {
        for (coin_id, amount) in other.iter() {
            self.add_signed(coin_id, amount);
        }
    }
}

impl SubAssign<&Balance> for Balance {
    fn sub_assign(&mut self, other: &Balance) {
        for (coin_id, amount) in other.iter() {
            self.add_signed(coin_id, -amount);
        }
    }
}

impl Add<&Balance> for Balance {
    type Output = Balance;

    fn add(mut self, other: &Balance) -> Balance {
        self += other;
        self
    }
}

impl Sub<&Balance> for Balance {
    type Output = Balance;

    fn sub(mut self, other: &Balance) -> Balance {
        self -= other;
        self
    }
}

impl Display for Balance {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{{")?;
        for (i, (coin_id, amount)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", coin_id, amount)?;
        }
        write!(f, "}}")
    }
}
