//! Object store modeling the execution environment: ownership, identity,
//! and the event feed.
//!
//! Operations take `&mut self`, so exclusive access serializes them and
//! each one observes and mutates the store atomically. Racing resolutions
//! of the same commitment collapse to an ordering question: the first
//! valid operation consumes it and the loser fails with
//! [`LedgerError::NotFound`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::asset::Entity;
use crate::error::LedgerError;
use crate::escrow::custodial::CustodialEscrow;
use crate::escrow::shared::SharedEscrow;
use crate::event::Event;
use crate::identity::{Party, ID};
use crate::lock::{Key, Locked};
use crate::Result;

/// Who controls a record.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Exclusively owned: only this party may present the object.
    Account(Party),
    /// Ownerless and publicly addressable; mutation is gated by the
    /// object's own guards instead.
    Shared,
}

/// Everything the store can host.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Object<T> {
    /// A raw asset in custody.
    Asset(T),
    /// An asset frozen behind a single-use key.
    Locked(Locked<T>),
    /// A single-use unlock credential.
    Key(Key),
    /// A publicly addressable escrow commitment.
    SharedEscrow(SharedEscrow<T>),
    /// An escrow commitment held by a custodian.
    CustodialEscrow(CustodialEscrow<T>),
}

impl<T> Object<T> {
    /// The kind tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Asset(_) => ObjectKind::Asset,
            Self::Locked(_) => ObjectKind::Locked,
            Self::Key(_) => ObjectKind::Key,
            Self::SharedEscrow(_) => ObjectKind::SharedEscrow,
            Self::CustodialEscrow(_) => ObjectKind::CustodialEscrow,
        }
    }
}

/// Kind tag for records; shows up in errors and views.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Asset,
    Locked,
    Key,
    SharedEscrow,
    CustodialEscrow,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Asset => "raw asset",
            Self::Locked => "locked asset",
            Self::Key => "key",
            Self::SharedEscrow => "shared escrow",
            Self::CustodialEscrow => "custodial escrow",
        };
        write!(f, "{name}")
    }
}

/// A hosted object together with its controller.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub struct Record<T> {
    pub owner: Owner,
    pub body: Object<T>,
}

/// Deterministic identity minter: SHA-256 over a seed and a monotonic
/// nonce.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
struct IdMinter {
    seed: [u8; 32],
    nonce: u64,
}

impl IdMinter {
    fn next(&mut self) -> ID {
        let digest = Sha256::new()
            .chain_update(self.seed)
            .chain_update(self.nonce.to_be_bytes())
            .finalize();
        self.nonce += 1;
        ID::new(digest.into())
    }
}

/// The object store hosting every protocol object.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub struct Ledger<T> {
    records: BTreeMap<ID, Record<T>>,
    /// Every identity currently in existence, including assets embedded in
    /// wrappers whose own record is absent from `records`.
    live: BTreeSet<ID>,
    minter: IdMinter,
    events: Vec<Event>,
}

impl<T: Entity> Ledger<T> {
    /// Empty ledger minting identities from a zero seed.
    pub fn new() -> Self {
        Self::with_seed([0u8; 32])
    }

    /// Empty ledger minting identities from the given seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            records: BTreeMap::new(),
            live: BTreeSet::new(),
            minter: IdMinter { seed, nonce: 0 },
            events: Vec::new(),
        }
    }

    /// Mints a fresh identity unused by any live object.
    pub fn fresh_id(&mut self) -> ID {
        loop {
            let id = self.minter.next();
            if !self.live.contains(&id) {
                return id;
            }
        }
    }

    /// Brings an externally created asset under ledger custody.
    ///
    /// # Errors
    ///
    /// Rejects an asset whose identity collides with any live one,
    /// including identities embedded inside locks and escrows.
    pub fn deposit(&mut self, owner: Party, asset: T) -> Result<ID> {
        let id = asset.id();
        if self.live.contains(&id) {
            return Err(LedgerError::IdentityTaken(id).into());
        }
        self.live.insert(id);
        self.records.insert(
            id,
            Record {
                owner: Owner::Account(owner),
                body: Object::Asset(asset),
            },
        );
        Ok(id)
    }

    /// Releases a caller-owned raw asset from custody and hands it back.
    pub fn withdraw(&mut self, caller: Party, id: ID) -> Result<T> {
        self.expect_kind(id, ObjectKind::Asset)?;
        self.expect_owner(caller, id)?;
        let asset = self.take_asset(id)?;
        self.live.remove(&id);
        Ok(asset)
    }

    /// Reassigns a caller-owned object to another party.
    ///
    /// Shared records have no owner and cannot be transferred.
    pub fn transfer(&mut self, caller: Party, id: ID, to: Party) -> Result<()> {
        self.expect_owner(caller, id)?;
        let record = self
            .records
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        record.owner = Owner::Account(to);
        Ok(())
    }

    /// Whether a live record sits under this id.
    pub fn contains(&self, id: ID) -> bool {
        self.records.contains_key(&id)
    }

    /// The controller of a record, if one exists.
    pub fn owner_of(&self, id: ID) -> Option<Owner> {
        self.records.get(&id).map(|record| record.owner)
    }

    /// The kind of a record, if one exists.
    pub fn kind_of(&self, id: ID) -> Option<ObjectKind> {
        self.records.get(&id).map(|record| record.body.kind())
    }

    /// A raw asset in custody.
    pub fn asset(&self, id: ID) -> Option<&T> {
        match self.records.get(&id) {
            Some(Record {
                body: Object::Asset(asset),
                ..
            }) => Some(asset),
            _ => None,
        }
    }

    /// A locked wrapper in custody.
    pub fn locked_asset(&self, id: ID) -> Option<&Locked<T>> {
        self.locked_view(id).ok()
    }

    /// A shared commitment, if it still exists.
    pub fn shared_escrow(&self, id: ID) -> Option<&SharedEscrow<T>> {
        self.shared_view(id).ok()
    }

    /// A custodial commitment, if it still exists.
    pub fn custodial_escrow(&self, id: ID) -> Option<&CustodialEscrow<T>> {
        self.custodial_view(id).ok()
    }

    /// Ids of every raw asset a party holds, in id order.
    pub fn holdings(&self, party: Party) -> Vec<ID> {
        self.records
            .iter()
            .filter(|(_, record)| {
                record.owner == Owner::Account(party)
                    && record.body.kind() == ObjectKind::Asset
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// All records, in id order.
    pub fn records(&self) -> impl Iterator<Item = (&ID, &Record<T>)> {
        self.records.iter()
    }

    /// The event feed, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn find(&self, id: ID) -> Result<&Record<T>> {
        self.records
            .get(&id)
            .ok_or_else(|| LedgerError::NotFound(id).into())
    }

    pub(crate) fn expect_owner(&self, caller: Party, id: ID) -> Result<()> {
        match self.find(id)?.owner {
            Owner::Account(owner) if owner == caller => Ok(()),
            _ => Err(LedgerError::NotOwner { object: id, caller }.into()),
        }
    }

    pub(crate) fn expect_kind(&self, id: ID, kind: ObjectKind) -> Result<()> {
        let found = self.find(id)?.body.kind();
        if found == kind {
            Ok(())
        } else {
            Err(LedgerError::KindMismatch(id, kind).into())
        }
    }

    pub(crate) fn locked_view(&self, id: ID) -> Result<&Locked<T>> {
        match &self.find(id)?.body {
            Object::Locked(locked) => Ok(locked),
            _ => Err(LedgerError::KindMismatch(id, ObjectKind::Locked).into()),
        }
    }

    pub(crate) fn key_view(&self, id: ID) -> Result<&Key> {
        match &self.find(id)?.body {
            Object::Key(key) => Ok(key),
            _ => Err(LedgerError::KindMismatch(id, ObjectKind::Key).into()),
        }
    }

    pub(crate) fn shared_view(&self, id: ID) -> Result<&SharedEscrow<T>> {
        match &self.find(id)?.body {
            Object::SharedEscrow(escrow) => Ok(escrow),
            _ => Err(LedgerError::KindMismatch(id, ObjectKind::SharedEscrow).into()),
        }
    }

    pub(crate) fn custodial_view(&self, id: ID) -> Result<&CustodialEscrow<T>> {
        match &self.find(id)?.body {
            Object::CustodialEscrow(escrow) => Ok(escrow),
            _ => Err(LedgerError::KindMismatch(id, ObjectKind::CustodialEscrow).into()),
        }
    }

    /// Inserts a record under a freshly minted id.
    pub(crate) fn admit(&mut self, id: ID, owner: Owner, body: Object<T>) {
        debug_assert!(!self.live.contains(&id));
        self.live.insert(id);
        self.records.insert(id, Record { owner, body });
    }

    /// Reinstates an asset whose identity is already live because it was
    /// embedded in a wrapper a terminal operation just consumed.
    pub(crate) fn restore_asset(&mut self, owner: Owner, asset: T) {
        let id = asset.id();
        debug_assert!(self.live.contains(&id));
        debug_assert!(!self.records.contains_key(&id));
        self.records.insert(
            id,
            Record {
                owner,
                body: Object::Asset(asset),
            },
        );
    }

    // The take_* family removes a record and returns its body. Callers
    // validate existence, kind and ownership before taking; a failed take
    // reinstates the record untouched, so a bad call has no effect.

    /// Removes a raw-asset record. The identity stays live: the asset
    /// either moves into a wrapper or leaves custody via [`Ledger::withdraw`].
    pub(crate) fn take_asset(&mut self, id: ID) -> Result<T> {
        let record = self.records.remove(&id).ok_or(LedgerError::NotFound(id))?;
        match record.body {
            Object::Asset(asset) => Ok(asset),
            body => {
                self.records.insert(id, Record { owner: record.owner, body });
                Err(LedgerError::KindMismatch(id, ObjectKind::Asset).into())
            }
        }
    }

    /// Consumes a key record; the identity dies.
    pub(crate) fn take_key(&mut self, id: ID) -> Result<Key> {
        let record = self.records.remove(&id).ok_or(LedgerError::NotFound(id))?;
        match record.body {
            Object::Key(key) => {
                self.live.remove(&id);
                Ok(key)
            }
            body => {
                self.records.insert(id, Record { owner: record.owner, body });
                Err(LedgerError::KindMismatch(id, ObjectKind::Key).into())
            }
        }
    }

    /// Consumes a locked wrapper; its identity dies, the embedded asset's
    /// identity stays live.
    pub(crate) fn take_locked(&mut self, id: ID) -> Result<Locked<T>> {
        let record = self.records.remove(&id).ok_or(LedgerError::NotFound(id))?;
        match record.body {
            Object::Locked(locked) => {
                self.live.remove(&id);
                Ok(locked)
            }
            body => {
                self.records.insert(id, Record { owner: record.owner, body });
                Err(LedgerError::KindMismatch(id, ObjectKind::Locked).into())
            }
        }
    }

    /// Consumes a shared commitment; its identity dies, the held asset's
    /// identity stays live.
    pub(crate) fn take_shared(&mut self, id: ID) -> Result<SharedEscrow<T>> {
        let record = self.records.remove(&id).ok_or(LedgerError::NotFound(id))?;
        match record.body {
            Object::SharedEscrow(escrow) => {
                self.live.remove(&id);
                Ok(escrow)
            }
            body => {
                self.records.insert(id, Record { owner: record.owner, body });
                Err(LedgerError::KindMismatch(id, ObjectKind::SharedEscrow).into())
            }
        }
    }

    /// Consumes a custodial commitment; its identity dies, the held
    /// asset's identity stays live.
    pub(crate) fn take_custodial(&mut self, id: ID) -> Result<CustodialEscrow<T>> {
        let record = self.records.remove(&id).ok_or(LedgerError::NotFound(id))?;
        match record.body {
            Object::CustodialEscrow(escrow) => {
                self.live.remove(&id);
                Ok(escrow)
            }
            body => {
                self.records.insert(id, Record { owner: record.owner, body });
                Err(LedgerError::KindMismatch(id, ObjectKind::CustodialEscrow).into())
            }
        }
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl<T: Entity> Default for Ledger<T> {
    fn default() -> Self {
        Self::new()
    }
}
