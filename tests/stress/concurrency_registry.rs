//! Concurrency test: racing callers on the registry.
//!
//! Validates that check-then-insert and check-then-remove are atomic:
//! exactly one winner per recipient, no lost deposits.

use std::sync::{Arc, Mutex};
use std::thread;

use agentic_custody::host::{Item, MemoryLedger, TxContext};
use agentic_custody::id::{Address, ObjectId};
use agentic_custody::registry::Registry;
use agentic_custody::{CustodyErrorKind, MAX_BAG_ITEMS};

#[derive(Debug)]
struct Parcel(ObjectId);

impl Item for Parcel {
    fn id(&self) -> ObjectId {
        self.0.clone()
    }
}

#[test]
fn stress_50_concurrent_creates_same_recipient() {
    let registry = Arc::new(Registry::new(MemoryLedger::new()));
    let bob = Address::generate();
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let registry = Arc::clone(&registry);
        let outcomes = Arc::clone(&outcomes);
        let bob = bob.clone();
        handles.push(thread::spawn(move || {
            let depositor = TxContext::new(Address::generate());
            let result = registry.create(&depositor, bob).map_err(|e| e.kind());
            outcomes.lock().unwrap().push(result);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let outcomes = outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 50);
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|k| *k == CustodyErrorKind::AlreadyExists));
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn stress_concurrent_claim_and_reclaim_single_winner() {
    let registry = Arc::new(Registry::new(MemoryLedger::new()));
    let alice = Address::generate();
    let bob = Address::generate();
    registry
        .create(&TxContext::new(alice.clone()), bob.clone())
        .unwrap();

    let sessions = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for i in 0..40 {
        let registry = Arc::clone(&registry);
        let sessions = Arc::clone(&sessions);
        let failures = Arc::clone(&failures);
        let alice = alice.clone();
        let bob = bob.clone();
        handles.push(thread::spawn(move || {
            // Half the threads claim as the recipient, half reclaim as the owner.
            let result = if i % 2 == 0 {
                registry.begin_claim(&TxContext::new(bob))
            } else {
                registry.reclaim(&TxContext::new(alice), &bob)
            };
            match result {
                Ok(session) => sessions.lock().unwrap().push(session),
                Err(e) => failures.lock().unwrap().push(e.kind()),
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let mut sessions = sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 39);
    assert!(failures.iter().all(|k| *k == CustodyErrorKind::NotFound));

    let (bag, token) = sessions.pop().unwrap();
    bag.finalize(token).unwrap();
    assert!(registry.is_empty().unwrap());
}

#[test]
fn stress_concurrent_deposits_respect_capacity() {
    let registry = Arc::new(Registry::new(MemoryLedger::new()));
    let alice = Address::generate();
    let bob = Address::generate();
    let bag_id = registry
        .create(&TxContext::new(alice.clone()), bob.clone())
        .unwrap();

    let accepted = Arc::new(Mutex::new(0usize));
    let returned = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        let accepted = Arc::clone(&accepted);
        let returned = Arc::clone(&returned);
        let alice = alice.clone();
        let bob = bob.clone();
        handles.push(thread::spawn(move || {
            let ctx = TxContext::new(alice);
            for _ in 0..100 {
                let parcel = Parcel(registry.ledger().mint_id());
                match registry.add_item(&ctx, &bob, parcel) {
                    Ok(()) => *accepted.lock().unwrap() += 1,
                    Err(rejected) => {
                        assert_eq!(rejected.kind(), CustodyErrorKind::CapacityExceeded);
                        returned.lock().unwrap().push(rejected.item);
                    }
                }
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(*accepted.lock().unwrap(), MAX_BAG_ITEMS);
    assert_eq!(returned.lock().unwrap().len(), 800 - MAX_BAG_ITEMS);
    assert_eq!(
        registry.summary(&bob).unwrap().pending_count,
        MAX_BAG_ITEMS
    );
    assert_eq!(
        registry.ledger().custody_count(&bag_id).unwrap(),
        MAX_BAG_ITEMS
    );
}

#[test]
fn stress_parallel_sessions_drain_independently() {
    let registry = Arc::new(Registry::new(MemoryLedger::new()));
    let alice = TxContext::new(Address::generate());

    let mut recipients = Vec::new();
    for _ in 0..20 {
        let r = Address::generate();
        registry.create(&alice, r.clone()).unwrap();
        for _ in 0..10 {
            registry
                .add_item(&alice, &r, Parcel(registry.ledger().mint_id()))
                .unwrap();
        }
        recipients.push(r);
    }

    let mut handles = Vec::new();
    for r in recipients {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let (mut bag, token) = registry.begin_claim(&TxContext::new(r)).unwrap();
            let ids: Vec<ObjectId> = bag.pending_items().cloned().collect();
            for id in ids {
                let ticket = registry
                    .ledger()
                    .receiving::<Parcel>(bag.id(), &id)
                    .unwrap();
                let parcel = bag.claim_item(&token, registry.ledger(), ticket).unwrap();
                assert_eq!(parcel.0, id);
            }
            bag.finalize(token).unwrap();
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(registry.is_empty().unwrap());
    assert!(registry.ledger().is_empty().unwrap());
}
