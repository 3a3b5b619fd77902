//! Trustless atomic swaps over an object ledger.
//!
//! Two parties exchange ownership of two assets so that neither side, nor
//! anyone else, can end up holding both. Commitments are expressed through
//! object custody and single-use keys instead of signatures: locking an
//! asset mints a key whose identity doubles as a tamper-evident
//! fingerprint of the locked content, because any attempt to swap the
//! content consumes the key. The [`escrow`] module builds two swap
//! protocols on that primitive, one with no third party at all and one
//! with a custodian trusted only for liveness.

/// Asset abstraction and the reference coin asset.
pub mod asset;
/// Escrow commitments and their resolution logic.
pub mod escrow;
/// Events emitted by protocol state transitions.
pub mod event;
/// Identities for ledger objects and parties.
pub mod identity;
/// JSON (de)serialization helpers for snapshots and swap data.
pub mod interface;
/// The object store hosting every protocol object.
pub mod ledger;
/// The single-use locking primitive.
pub mod lock;

pub mod error;

pub use asset::{Coin, Entity};
pub use error::{AssetError, IdentityError, LedgerError, SwapError};
pub use escrow::custodial::CustodialEscrow;
pub use escrow::shared::SharedEscrow;
pub use event::Event;
pub use identity::{Party, ID};
pub use ledger::{Ledger, Object, ObjectKind, Owner, Record};
pub use lock::{Key, Locked};

pub type Result<T> = std::result::Result<T, SwapError>;
