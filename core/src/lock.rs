//! The single-use locking primitive.
//!
//! Locking an asset mints a key whose identity doubles as a commitment to
//! the asset's content at lock time: unlocking consumes the key, and
//! re-locking mints a different one. A recorded key id is therefore a
//! tamper-evident fingerprint, with no content hashing involved.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::asset::Entity;
use crate::error::SwapError;
use crate::event::Event;
use crate::identity::{Party, ID};
use crate::ledger::{Ledger, Object, ObjectKind, Owner};
use crate::Result;

/// Single-use credential paired with exactly one [`Locked`] wrapper.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct Key {
    id: ID,
}

impl Key {
    pub(crate) fn new(id: ID) -> Self {
        Self { id }
    }

    /// This key's identity, which is also the fingerprint recorded by the
    /// lock it opens.
    pub fn id(&self) -> ID {
        self.id
    }
}

/// An asset frozen behind a single-use key.
///
/// The wrapped asset is reachable only by presenting the key whose id
/// equals `key_id`; everything else about the wrapper is public.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct Locked<T> {
    id: ID,
    key_id: ID,
    item: T,
}

impl<T> Locked<T> {
    pub(crate) fn new(id: ID, key_id: ID, item: T) -> Self {
        Self { id, key_id, item }
    }

    /// This wrapper's identity.
    pub fn id(&self) -> ID {
        self.id
    }

    /// Identity of the key that opens this wrapper.
    pub fn key_id(&self) -> ID {
        self.key_id
    }

    /// Checks that `key` is the pairing credential.
    pub fn verify_key(&self, key: &Key) -> Result<()> {
        if self.key_id.ct_eq(&key.id) {
            Ok(())
        } else {
            Err(SwapError::KeyMismatch)
        }
    }

    pub(crate) fn into_item(self) -> T {
        self.item
    }
}

impl<T: Entity> Ledger<T> {
    /// Locks a caller-owned asset behind a freshly minted single-use key.
    ///
    /// The raw-asset record is consumed; the caller receives the locked
    /// wrapper and its key as two new owned objects, returned as
    /// `(lock_id, key_id)`.
    pub fn lock(&mut self, caller: Party, item: ID) -> Result<(ID, ID)> {
        self.expect_kind(item, ObjectKind::Asset)?;
        self.expect_owner(caller, item)?;

        let asset = self.take_asset(item)?;
        let key_id = self.fresh_id();
        let lock_id = self.fresh_id();
        self.admit(key_id, Owner::Account(caller), Object::Key(Key::new(key_id)));
        self.admit(
            lock_id,
            Owner::Account(caller),
            Object::Locked(Locked::new(lock_id, key_id, asset)),
        );
        self.emit(Event::LockCreated {
            lock_id,
            key_id,
            creator: caller,
            item_id: item,
        });
        Ok((lock_id, key_id))
    }

    /// Opens a caller-owned lock with its key, consuming both.
    ///
    /// The freed asset reappears as a raw-asset record owned by the
    /// caller; its id is returned.
    pub fn unlock(&mut self, caller: Party, lock: ID, key: ID) -> Result<ID> {
        let locked = self.locked_view(lock)?;
        self.expect_owner(caller, lock)?;
        let presented = self.key_view(key)?;
        self.expect_owner(caller, key)?;
        locked.verify_key(presented)?;

        let item = self.consume_pair(lock, key)?;
        let item_id = item.id();
        self.restore_asset(Owner::Account(caller), item);
        Ok(item_id)
    }

    /// Consumes a validated key/lock pair and returns the freed asset.
    /// Emits the lock-destruction event.
    pub(crate) fn consume_pair(&mut self, lock: ID, key: ID) -> Result<T> {
        let locked = self.take_locked(lock)?;
        self.take_key(key)?;
        self.emit(Event::LockDestroyed { lock_id: lock });
        Ok(locked.into_item())
    }
}
