//! Shared-custody escrow: a public commitment resolved unilaterally by
//! its designated recipient.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::asset::Entity;
use crate::error::SwapError;
use crate::event::Event;
use crate::identity::{Party, ID};
use crate::ledger::{Ledger, Object, ObjectKind, Owner};
use crate::lock::Key;
use crate::Result;

/// A publicly addressable commitment holding the sender's asset.
///
/// All fields are fixed at creation. The commitment is consumed by
/// exactly one of swap or cancellation, whichever lands first.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub struct SharedEscrow<T> {
    id: ID,
    sender: Party,
    recipient: Party,
    /// Identity of the single-use key the recipient must present.
    exchange_key: ID,
    held: T,
}

impl<T> SharedEscrow<T> {
    pub(crate) fn new(id: ID, sender: Party, recipient: Party, exchange_key: ID, held: T) -> Self {
        Self {
            id,
            sender,
            recipient,
            exchange_key,
            held,
        }
    }

    /// This commitment's identity.
    pub fn id(&self) -> ID {
        self.id
    }

    /// Who funded the commitment and receives the counter-asset.
    pub fn sender(&self) -> Party {
        self.sender
    }

    /// Who may resolve the commitment.
    pub fn recipient(&self) -> Party {
        self.recipient
    }

    /// Fingerprint of the key the recipient committed to hand over.
    pub fn exchange_key(&self) -> ID {
        self.exchange_key
    }

    /// The asset held in escrow.
    pub fn held(&self) -> &T {
        &self.held
    }

    pub(crate) fn into_held(self) -> T {
        self.held
    }

    pub(crate) fn verify_recipient(&self, caller: Party) -> Result<()> {
        if self.recipient == caller {
            Ok(())
        } else {
            Err(SwapError::SenderRecipientMismatch)
        }
    }

    pub(crate) fn verify_sender(&self, caller: Party) -> Result<()> {
        if self.sender == caller {
            Ok(())
        } else {
            Err(SwapError::SenderRecipientMismatch)
        }
    }

    pub(crate) fn verify_exchange_key(&self, key: &Key) -> Result<()> {
        if self.exchange_key.ct_eq(&key.id()) {
            Ok(())
        } else {
            Err(SwapError::ExchangeObjectMismatch)
        }
    }
}

impl<T: Entity> Ledger<T> {
    /// Publishes a shared commitment offering a caller-owned asset to
    /// `recipient` in exchange for the key identified by `exchange_key`.
    ///
    /// The asset record is consumed into the commitment, which becomes an
    /// ownerless shared object. Returns the commitment's id.
    pub fn shared_create(
        &mut self,
        caller: Party,
        item: ID,
        exchange_key: ID,
        recipient: Party,
    ) -> Result<ID> {
        self.expect_kind(item, ObjectKind::Asset)?;
        self.expect_owner(caller, item)?;

        let held = self.take_asset(item)?;
        let escrow_id = self.fresh_id();
        let escrow = SharedEscrow::new(escrow_id, caller, recipient, exchange_key, held);
        self.admit(escrow_id, Owner::Shared, Object::SharedEscrow(escrow));
        self.emit(Event::EscrowCreated {
            escrow_id,
            key_id: exchange_key,
            sender: caller,
            recipient,
            item_id: item,
        });
        Ok(escrow_id)
    }

    /// Resolves a shared commitment.
    ///
    /// The caller must be the designated recipient and must present a
    /// caller-owned lock/key pair whose key carries the committed
    /// fingerprint. The unlocked asset goes to the sender, the held asset
    /// to the caller; the commitment, lock and key are all consumed.
    /// Returns the id of the asset the caller received.
    pub fn shared_swap(&mut self, caller: Party, escrow: ID, key: ID, lock: ID) -> Result<ID> {
        // every guard runs before the first mutation
        let commitment = self.shared_view(escrow)?;
        commitment.verify_recipient(caller)?;
        let sender = commitment.sender();
        let presented = self.key_view(key)?;
        self.expect_owner(caller, key)?;
        commitment.verify_exchange_key(presented)?;
        let locked = self.locked_view(lock)?;
        self.expect_owner(caller, lock)?;
        locked.verify_key(presented)?;

        let item = self.consume_pair(lock, key)?;
        let held = self.take_shared(escrow)?.into_held();
        let held_id = held.id();
        self.restore_asset(Owner::Account(sender), item);
        self.restore_asset(Owner::Account(caller), held);
        self.emit(Event::EscrowSwapped { escrow_id: escrow });
        Ok(held_id)
    }

    /// Cancels a shared commitment, returning the held asset to its
    /// sender. Only the sender may cancel, at any time before the swap
    /// lands. Returns the id of the returned asset.
    pub fn shared_return_to_sender(&mut self, caller: Party, escrow: ID) -> Result<ID> {
        let commitment = self.shared_view(escrow)?;
        commitment.verify_sender(caller)?;

        let held = self.take_shared(escrow)?.into_held();
        let held_id = held.id();
        self.restore_asset(Owner::Account(caller), held);
        self.emit(Event::EscrowCancelled { escrow_id: escrow });
        Ok(held_id)
    }
}
