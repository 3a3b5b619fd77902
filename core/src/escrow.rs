//! Escrow commitments and their resolution logic.
//!
//! Two variants with different trust shapes share one anti-tamper scheme:
//!
//! * [`shared`] publishes the commitment as an ownerless object that its
//!   designated recipient resolves unilaterally; no third party at all.
//! * [`custodial`] hands the commitment to a custodian who can order a
//!   matched pair of commitments resolved, or return an asset to its
//!   sender, but can never redirect one.
//!
//! In both, the committed exchange fingerprint is the identity of a
//! single-use key. Unlocking to tamper with an asset consumes that key,
//! so the fingerprint can never match again.

pub mod custodial;
pub mod shared;
