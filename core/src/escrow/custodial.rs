//! Custodian-mediated escrow: two owned commitments resolved pairwise by
//! a third party trusted for liveness only.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::asset::Entity;
use crate::error::{LedgerError, SwapError};
use crate::event::Event;
use crate::identity::{Party, ID};
use crate::ledger::{Ledger, Object, Owner};
use crate::Result;

/// A commitment handed to a custodian.
///
/// `committed_key` is the id of the single-use key consumed when the
/// commitment was created. Re-locking the asset afterwards would mint a
/// different key, so a counterparty's recorded `exchange_key` could never
/// match it again.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub struct CustodialEscrow<T> {
    id: ID,
    sender: Party,
    recipient: Party,
    /// Fingerprint of the key the counterparty must have consumed.
    exchange_key: ID,
    /// Fingerprint of the key consumed to create this commitment.
    committed_key: ID,
    held: T,
}

impl<T> CustodialEscrow<T> {
    pub(crate) fn new(
        id: ID,
        sender: Party,
        recipient: Party,
        exchange_key: ID,
        committed_key: ID,
        held: T,
    ) -> Self {
        Self {
            id,
            sender,
            recipient,
            exchange_key,
            committed_key,
            held,
        }
    }

    /// This commitment's identity.
    pub fn id(&self) -> ID {
        self.id
    }

    /// Who funded the commitment.
    pub fn sender(&self) -> Party {
        self.sender
    }

    /// Who receives the held asset on a successful swap.
    pub fn recipient(&self) -> Party {
        self.recipient
    }

    /// Fingerprint the counterparty's commitment must carry.
    pub fn exchange_key(&self) -> ID {
        self.exchange_key
    }

    /// Fingerprint of this commitment's own consumed key.
    pub fn committed_key(&self) -> ID {
        self.committed_key
    }

    /// The asset held in escrow.
    pub fn held(&self) -> &T {
        &self.held
    }

    pub(crate) fn into_held(self) -> T {
        self.held
    }

    /// Verifies the four-way cross-match between two commitments.
    ///
    /// The relation is directional, so both directions are checked:
    /// each side's sender must be the other's recipient, and each side's
    /// consumed key must carry the fingerprint the other committed to.
    pub(crate) fn verify_pair(first: &Self, second: &Self) -> Result<()> {
        if first.sender != second.recipient || second.sender != first.recipient {
            return Err(SwapError::SenderRecipientMismatch);
        }
        if !first.committed_key.ct_eq(&second.exchange_key)
            || !second.committed_key.ct_eq(&first.exchange_key)
        {
            return Err(SwapError::ExchangeObjectMismatch);
        }
        Ok(())
    }
}

impl<T: Entity> Ledger<T> {
    /// Unlocks a caller-owned lock/key pair and hands the freed asset to
    /// `custodian` as an escrow commitment.
    ///
    /// The consumed key's id becomes the commitment's tamper anchor; the
    /// custodian owns the commitment object but can only ever route its
    /// asset to `recipient` (by pairwise swap) or back to the caller.
    /// Returns the commitment's id.
    pub fn custodial_create(
        &mut self,
        caller: Party,
        key: ID,
        lock: ID,
        exchange_key: ID,
        recipient: Party,
        custodian: Party,
    ) -> Result<ID> {
        let locked = self.locked_view(lock)?;
        self.expect_owner(caller, lock)?;
        let presented = self.key_view(key)?;
        self.expect_owner(caller, key)?;
        locked.verify_key(presented)?;

        let held = self.consume_pair(lock, key)?;
        let item_id = held.id();
        let escrow_id = self.fresh_id();
        let escrow = CustodialEscrow::new(escrow_id, caller, recipient, exchange_key, key, held);
        self.admit(
            escrow_id,
            Owner::Account(custodian),
            Object::CustodialEscrow(escrow),
        );
        self.emit(Event::EscrowCreated {
            escrow_id,
            key_id: exchange_key,
            sender: caller,
            recipient,
            item_id,
        });
        Ok(escrow_id)
    }

    /// Resolves two cross-matched commitments held by the caller.
    ///
    /// Each held asset goes to that commitment's recipient. A failure on
    /// any check leaves both commitments intact. Returns the ids of the
    /// two released assets, in argument order.
    pub fn custodial_swap(&mut self, caller: Party, first: ID, second: ID) -> Result<(ID, ID)> {
        if first == second {
            return Err(LedgerError::Duplicate(first).into());
        }
        let a = self.custodial_view(first)?;
        self.expect_owner(caller, first)?;
        let b = self.custodial_view(second)?;
        self.expect_owner(caller, second)?;
        CustodialEscrow::verify_pair(a, b)?;
        let to_first = a.recipient();
        let to_second = b.recipient();

        let released_first = self.take_custodial(first)?.into_held();
        let released_second = self.take_custodial(second)?.into_held();
        let ids = (released_first.id(), released_second.id());
        self.restore_asset(Owner::Account(to_first), released_first);
        self.restore_asset(Owner::Account(to_second), released_second);
        self.emit(Event::EscrowSwapped { escrow_id: first });
        self.emit(Event::EscrowSwapped { escrow_id: second });
        Ok(ids)
    }

    /// Returns a commitment's asset to its original sender.
    ///
    /// This is the custodian's liveness duty when a swap falls through.
    /// The destination was fixed at creation, so the call can never
    /// redirect an asset. Returns the id of the returned asset.
    pub fn custodial_return_to_sender(&mut self, caller: Party, escrow: ID) -> Result<ID> {
        let commitment = self.custodial_view(escrow)?;
        let sender = commitment.sender();
        self.expect_owner(caller, escrow)?;

        let held = self.take_custodial(escrow)?.into_held();
        let held_id = held.id();
        self.restore_asset(Owner::Account(sender), held);
        self.emit(Event::EscrowCancelled { escrow_id: escrow });
        Ok(held_id)
    }
}
