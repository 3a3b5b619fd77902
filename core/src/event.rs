//! Events emitted by protocol state transitions.
//!
//! Field sets are a compatibility surface: external indexers tail the
//! ledger's event feed, and every transition appends exactly one event per
//! object it creates or consumes.

use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::identity::{Party, ID};

/// A protocol event, in emission order on the ledger's feed.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    /// An asset was locked behind a freshly minted single-use key.
    LockCreated {
        lock_id: ID,
        key_id: ID,
        creator: Party,
        item_id: ID,
    },
    /// A locked wrapper was consumed, either by a plain unlock or as part
    /// of an escrow transition.
    LockDestroyed { lock_id: ID },
    /// An escrow commitment was published or handed to a custodian.
    EscrowCreated {
        escrow_id: ID,
        key_id: ID,
        sender: Party,
        recipient: Party,
        item_id: ID,
    },
    /// A commitment resolved by swap.
    EscrowSwapped { escrow_id: ID },
    /// A commitment resolved by cancellation.
    EscrowCancelled { escrow_id: ID },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}
