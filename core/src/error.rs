use thiserror::Error;

use crate::identity::{Party, ID};
use crate::ledger::ObjectKind;

/// Swap protocol errors.
#[derive(Debug, Error, PartialEq)]
pub enum SwapError {
    /// Presented key does not pair with the presented locked asset.
    #[error("key does not pair with the locked asset")]
    KeyMismatch,

    /// The committed sender/recipient relation does not hold for the caller.
    #[error("sender/recipient relation not satisfied")]
    SenderRecipientMismatch,

    /// Presented object does not carry the committed exchange fingerprint.
    #[error("exchange object does not match the commitment")]
    ExchangeObjectMismatch,

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("identity error: {0}")]
    Identity(IdentityError),

    #[error("asset error: {0}")]
    Asset(AssetError),
}

/// Precondition failures raised by the object store.
///
/// These sit outside the protocol taxonomy proper: the loser of a
/// swap/cancel race observes `NotFound`, never a protocol error.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// No live record under this id; it never existed or was already
    /// consumed.
    #[error("object {0} does not exist")]
    NotFound(ID),

    /// Caller presented an object controlled by someone else.
    #[error("object {object} is not owned by {caller}")]
    NotOwner { object: ID, caller: Party },

    /// The record under this id is not of the kind the operation expects.
    #[error("object {0} is not a {1}")]
    KindMismatch(ID, ObjectKind),

    /// The same object was presented twice within one operation.
    #[error("object {0} presented twice")]
    Duplicate(ID),

    /// A deposit tried to reuse an identity that is still live.
    #[error("identity {0} is already taken")]
    IdentityTaken(ID),
}

/// Errors that might occur while parsing into an `ID`.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot parse identity from empty string")]
    EmptyIdentity,

    #[error("identity must decode to exactly 32 bytes, got {0}")]
    BadLength(usize),

    #[error("unsupported identity format")]
    UnsupportedFormat,
}

/// Errors when working with the reference coin asset.
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("value must be non-zero")]
    ZeroValue,

    #[error("cannot take {requested} from a coin of value {value}")]
    InsufficientValue { value: u64, requested: u64 },

    #[error("value overflow")]
    Overflow,
}

impl From<LedgerError> for SwapError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<IdentityError> for SwapError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<AssetError> for SwapError {
    fn from(value: AssetError) -> Self {
        Self::Asset(value)
    }
}
