//! Asset abstraction and the reference coin asset.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::identity::ID;
use crate::Result;

/// Anything the ledger can take into custody.
///
/// The single requirement is a stable identity. Identity survives content
/// mutation: a coin keeps its id when its value changes. Tamper evidence
/// in the protocol therefore rests on key consumption, never on hashing
/// asset contents.
pub trait Entity {
    /// Stable identity of this asset.
    fn id(&self) -> ID;
}

/// Reference asset for demos and tests: a coin with a mutable value.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    id: ID,
    value: u64,
}

impl Coin {
    /// Mints a coin under the given identity.
    ///
    /// # Errors
    ///
    /// Rejects zero-value coins.
    pub fn new(id: ID, value: u64) -> Result<Self> {
        if value == 0 {
            return Err(AssetError::ZeroValue.into());
        }
        Ok(Self { id, value })
    }

    /// Current value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Carves `amount` off into a new coin minted under `new_id`.
    ///
    /// # Errors
    ///
    /// Fails if `amount` is zero or would drain this coin entirely.
    pub fn split(&mut self, amount: u64, new_id: ID) -> Result<Self> {
        if amount == 0 {
            return Err(AssetError::ZeroValue.into());
        }
        if amount >= self.value {
            return Err(AssetError::InsufficientValue {
                value: self.value,
                requested: amount,
            }
            .into());
        }
        self.value -= amount;
        Self::new(new_id, amount)
    }

    /// Absorbs another coin's value; the other coin's identity dies with it.
    ///
    /// # Errors
    ///
    /// Fails on value overflow; this coin keeps its value.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        self.value = self
            .value
            .checked_add(other.value)
            .ok_or(AssetError::Overflow)?;
        Ok(())
    }
}

impl Entity for Coin {
    fn id(&self) -> ID {
        self.id
    }
}
