use swaplock_core::{
    Coin, Event, Ledger, LedgerError, Party, Result, SwapError, ID,
};

fn assert_err<T>(res: Result<T>, expected: SwapError) {
    match res {
        Err(e) => assert_eq!(e, expected),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

fn fund(ledger: &mut Ledger<Coin>, owner: Party, value: u64) -> ID {
    let id = ledger.fresh_id();
    let coin = Coin::new(id, value).unwrap();
    ledger.deposit(owner, coin).unwrap()
}

#[test]
fn shared_escrow_settles_an_atomic_swap() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);

    // bob locks the coin alice wants and publishes the key's id
    let (lock, key) = ledger.lock(bob, wanted).unwrap();

    // alice commits her coin against that fingerprint
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();
    assert!(ledger.holdings(alice).is_empty());

    // bob resolves; both sides settle in one operation
    let received = ledger.shared_swap(bob, escrow, key, lock).unwrap();
    assert_eq!(received, offered);
    assert_eq!(ledger.holdings(alice), vec![wanted]);
    assert_eq!(ledger.holdings(bob), vec![offered]);
    assert_eq!(ledger.asset(wanted).unwrap().value(), 200);
    assert_eq!(ledger.asset(offered).unwrap().value(), 100);

    let swaps = ledger
        .events()
        .iter()
        .filter(|e| matches!(e, Event::EscrowSwapped { .. }))
        .count();
    assert_eq!(swaps, 1);
}

#[test]
fn shared_escrow_detects_tampering() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);

    let (lock, key) = ledger.lock(bob, wanted).unwrap();
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();

    // bob reneges: unlocks, shaves value off, and locks the coin again
    ledger.unlock(bob, lock, key).unwrap();
    let mut coin = ledger.withdraw(bob, wanted).unwrap();
    let change = coin.split(50, ledger.fresh_id()).unwrap();
    ledger.deposit(bob, coin).unwrap();
    ledger.deposit(bob, change).unwrap();
    let (new_lock, new_key) = ledger.lock(bob, wanted).unwrap();

    // the fresh key can never carry the committed fingerprint
    assert_err(
        ledger.shared_swap(bob, escrow, new_key, new_lock),
        SwapError::ExchangeObjectMismatch,
    );

    // alice walks away whole
    let returned = ledger.shared_return_to_sender(alice, escrow).unwrap();
    assert_eq!(returned, offered);
    assert_eq!(ledger.asset(offered).unwrap().value(), 100);
}

#[test]
fn shared_escrow_race_has_one_winner() {
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");

    // cancel lands first; the recipient's swap finds nothing
    let mut ledger = Ledger::new();
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);
    let (lock, key) = ledger.lock(bob, wanted).unwrap();
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();

    ledger.shared_return_to_sender(alice, escrow).unwrap();
    assert_err(
        ledger.shared_swap(bob, escrow, key, lock),
        SwapError::Ledger(LedgerError::NotFound(escrow)),
    );

    // swap lands first; the sender's cancel finds nothing
    let mut ledger = Ledger::new();
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);
    let (lock, key) = ledger.lock(bob, wanted).unwrap();
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();

    ledger.shared_swap(bob, escrow, key, lock).unwrap();
    assert_err(
        ledger.shared_return_to_sender(alice, escrow),
        SwapError::Ledger(LedgerError::NotFound(escrow)),
    );

    // the settled balances stand
    assert_eq!(ledger.holdings(alice), vec![wanted]);
    assert_eq!(ledger.holdings(bob), vec![offered]);
}

#[test]
fn lock_and_key_move_as_a_pair() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let carol = Party::from_label("carol");
    let item = fund(&mut ledger, alice, 10);

    let (lock, key) = ledger.lock(alice, item).unwrap();
    ledger.transfer(alice, lock, carol).unwrap();
    ledger.transfer(alice, key, carol).unwrap();

    // custody of the pair is custody of the asset
    let back = ledger.unlock(carol, lock, key).unwrap();
    assert_eq!(back, item);
    assert_eq!(ledger.holdings(carol), vec![item]);
}

#[test]
fn custodial_escrow_settles_with_liveness_only_trust() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let carol = Party::from_label("carol");
    let item_a = fund(&mut ledger, alice, 100);
    let item_b = fund(&mut ledger, bob, 200);

    // both parties lock, exchange key ids out of band, then commit
    let (lock_a, key_a) = ledger.lock(alice, item_a).unwrap();
    let (lock_b, key_b) = ledger.lock(bob, item_b).unwrap();
    let escrow_a = ledger
        .custodial_create(alice, key_a, lock_a, key_b, bob, carol)
        .unwrap();
    let escrow_b = ledger
        .custodial_create(bob, key_b, lock_b, key_a, alice, carol)
        .unwrap();

    // the custodian holds commitment objects, never raw assets
    assert!(ledger.holdings(carol).is_empty());

    let (first, second) = ledger.custodial_swap(carol, escrow_a, escrow_b).unwrap();
    assert_eq!((first, second), (item_a, item_b));
    assert_eq!(ledger.holdings(alice), vec![item_b]);
    assert_eq!(ledger.holdings(bob), vec![item_a]);
    assert!(ledger.holdings(carol).is_empty());

    // both resolutions are final
    assert_err(
        ledger.custodial_return_to_sender(carol, escrow_a),
        SwapError::Ledger(LedgerError::NotFound(escrow_a)),
    );
}

#[test]
fn custodial_escrow_unwinds_when_the_deal_dies() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let carol = Party::from_label("carol");
    let item = fund(&mut ledger, alice, 100);

    // alice commits; bob never shows up
    let (lock, key) = ledger.lock(alice, item).unwrap();
    let escrow = ledger
        .custodial_create(alice, key, lock, ID::new([7u8; 32]), bob, carol)
        .unwrap();

    let returned = ledger.custodial_return_to_sender(carol, escrow).unwrap();
    assert_eq!(returned, item);
    assert_eq!(ledger.holdings(alice), vec![item]);
    assert_eq!(ledger.asset(item).unwrap().value(), 100);

    // a second return finds the commitment gone
    assert_err(
        ledger.custodial_return_to_sender(carol, escrow),
        SwapError::Ledger(LedgerError::NotFound(escrow)),
    );
}

#[test]
fn custodial_escrow_detects_tampering() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let carol = Party::from_label("carol");
    let item_a = fund(&mut ledger, alice, 100);
    let item_b = fund(&mut ledger, bob, 200);

    let (lock_a, key_a) = ledger.lock(alice, item_a).unwrap();
    let (lock_b, key_b) = ledger.lock(bob, item_b).unwrap();

    // alice commits against bob's original key
    let escrow_a = ledger
        .custodial_create(alice, key_a, lock_a, key_b, bob, carol)
        .unwrap();

    // bob reneges: unlocks, drains value, re-locks and commits anyway
    ledger.unlock(bob, lock_b, key_b).unwrap();
    let mut coin = ledger.withdraw(bob, item_b).unwrap();
    let change = coin.split(150, ledger.fresh_id()).unwrap();
    ledger.deposit(bob, coin).unwrap();
    ledger.deposit(bob, change).unwrap();
    let (new_lock, new_key) = ledger.lock(bob, item_b).unwrap();
    let escrow_b = ledger
        .custodial_create(bob, new_key, new_lock, key_a, alice, carol)
        .unwrap();

    // bob's consumed key no longer matches what alice committed to
    assert_err(
        ledger.custodial_swap(carol, escrow_a, escrow_b),
        SwapError::ExchangeObjectMismatch,
    );

    // the custodian unwinds both sides untouched
    ledger.custodial_return_to_sender(carol, escrow_a).unwrap();
    ledger.custodial_return_to_sender(carol, escrow_b).unwrap();
    assert_eq!(ledger.asset(item_a).unwrap().value(), 100);
    assert_eq!(ledger.asset(item_b).unwrap().value(), 50);
    assert_eq!(ledger.holdings(alice), vec![item_a]);
}

#[test]
fn event_feed_records_every_transition() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);

    let (lock, key) = ledger.lock(bob, wanted).unwrap();
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();
    ledger.shared_swap(bob, escrow, key, lock).unwrap();

    assert_eq!(
        ledger.events(),
        &[
            Event::LockCreated {
                lock_id: lock,
                key_id: key,
                creator: bob,
                item_id: wanted,
            },
            Event::EscrowCreated {
                escrow_id: escrow,
                key_id: key,
                sender: alice,
                recipient: bob,
                item_id: offered,
            },
            Event::LockDestroyed { lock_id: lock },
            Event::EscrowSwapped { escrow_id: escrow },
        ]
    );
}

#[test]
fn failed_operations_leave_no_trace() {
    let mut ledger = Ledger::new();
    let alice = Party::from_label("alice");
    let bob = Party::from_label("bob");
    let mallory = Party::from_label("mallory");
    let offered = fund(&mut ledger, alice, 100);
    let wanted = fund(&mut ledger, bob, 200);

    let (lock, key) = ledger.lock(bob, wanted).unwrap();
    let escrow = ledger.shared_create(alice, offered, key, bob).unwrap();
    let before = ledger.events().len();

    // a stranger probing the commitment changes nothing
    assert_err(
        ledger.shared_swap(mallory, escrow, key, lock),
        SwapError::SenderRecipientMismatch,
    );
    assert_err(
        ledger.shared_return_to_sender(mallory, escrow),
        SwapError::SenderRecipientMismatch,
    );
    assert_eq!(ledger.events().len(), before);
    assert!(ledger.shared_escrow(escrow).is_some());

    // the intended resolution still goes through
    ledger.shared_swap(bob, escrow, key, lock).unwrap();
}
