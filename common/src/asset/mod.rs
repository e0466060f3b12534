mod mint;
mod rule;

pub use mint::*;
pub use rule::*;

/// Coin identifier. Zero is the base network asset, every nonzero id is a
/// mint coin governed by its owner's transactions.
pub type CoinId = u32;
