//! Integration test: full end-to-end custody workflow.
//!
//! Tests the complete lifecycle:
//! 1. Depositor creates a bag for a recipient
//! 2. Depositor stages items
//! 3. Recipient begins a claim and drains the bag item by item
//! 4. Finalize is refused while items remain, then succeeds

use agentic_custody::host::{Item, MemoryLedger, TxContext};
use agentic_custody::id::{Address, ObjectId};
use agentic_custody::registry::Registry;
use agentic_custody::{CustodyError, CustodyErrorKind, Ledger};

#[derive(Debug, PartialEq)]
struct Artifact {
    id: ObjectId,
    label: String,
}

impl Item for Artifact {
    fn id(&self) -> ObjectId {
        self.id.clone()
    }
}

#[derive(Debug, PartialEq)]
struct Credits {
    id: ObjectId,
    amount: u64,
}

impl Item for Credits {
    fn id(&self) -> ObjectId {
        self.id.clone()
    }
}

#[test]
fn full_workflow_create_to_finalize() {
    let registry = Registry::new(MemoryLedger::new());
    let alice = TxContext::new(Address::generate());
    let bob_addr = Address::generate();
    let bob = TxContext::new(bob_addr.clone());

    // ── Step 1: Create the bag ──────────────────────────────────────────
    let bag_id = registry
        .create(&alice, bob_addr.clone())
        .expect("alice should be able to create a bag for bob");
    assert!(registry.contains(&bob_addr).unwrap());

    // ── Step 2: Stage two items of different types ──────────────────────
    let x_id = registry.ledger().mint_id();
    let y_id = registry.ledger().mint_id();
    registry
        .add_item(
            &alice,
            &bob_addr,
            Artifact {
                id: x_id.clone(),
                label: "report.pdf".into(),
            },
        )
        .expect("deposit of X should succeed");
    registry
        .add_item(
            &alice,
            &bob_addr,
            Credits {
                id: y_id.clone(),
                amount: 250,
            },
        )
        .expect("deposit of Y should succeed");
    assert_eq!(registry.summary(&bob_addr).unwrap().pending_count, 2);
    assert_eq!(registry.ledger().custody_count(&bag_id).unwrap(), 2);

    // ── Step 3: Bob detaches the bag ─────────────────────────────────────
    let (mut bag, token) = registry.begin_claim(&bob).expect("bob has a bag");
    assert_eq!(bag.id(), &bag_id);
    assert!(!registry.contains(&bob_addr).unwrap());

    let receipt_x = registry
        .ledger()
        .receiving::<Artifact>(bag.id(), &x_id)
        .unwrap();
    let x = bag
        .claim_item(&token, registry.ledger(), receipt_x)
        .expect("X is pending");
    assert_eq!(x.label, "report.pdf");
    assert_eq!(bag.len(), 1);
    assert!(bag.contains_item(&y_id));

    // ── Step 4: Finalize too early, then drain and finalize ─────────────
    let refused = bag.finalize(token).expect_err("Y is still pending");
    assert!(matches!(refused.error, CustodyError::ItemsRemaining(1)));
    let (_, mut bag, token) = refused.into_parts();

    let receipt_y = registry
        .ledger()
        .receiving::<Credits>(bag.id(), &y_id)
        .unwrap();
    let y = bag
        .claim_item(&token, registry.ledger(), receipt_y)
        .expect("Y is pending");
    assert_eq!(y.amount, 250);
    assert!(bag.is_empty());

    bag.finalize(token).expect("empty bag finalizes");
    assert!(registry.ledger().is_empty().unwrap());
    assert!(registry.is_empty().unwrap());
}

#[test]
fn full_workflow_redirect_then_claim() {
    let registry = Registry::new(MemoryLedger::new());
    let alice = TxContext::new(Address::generate());
    let bob = Address::generate();
    let carol = Address::generate();

    registry.create(&alice, bob.clone()).unwrap();
    let id = registry.ledger().mint_id();
    registry
        .add_item(
            &alice,
            &bob,
            Artifact {
                id: id.clone(),
                label: "keys".into(),
            },
        )
        .unwrap();

    registry.redirect(&alice, &bob, carol.clone()).unwrap();

    let err = registry
        .begin_claim(&TxContext::new(bob.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), CustodyErrorKind::NotFound);

    let (mut bag, token) = registry.begin_claim(&TxContext::new(carol)).unwrap();
    let ticket = registry
        .ledger()
        .receiving::<Artifact>(bag.id(), &id)
        .unwrap();
    let artifact = bag.claim_item(&token, registry.ledger(), ticket).unwrap();
    assert_eq!(artifact.label, "keys");
    bag.finalize(token).unwrap();
}

#[test]
fn full_workflow_owner_reclaims_from_unresponsive_recipient() {
    let registry = Registry::new(MemoryLedger::new());
    let alice_addr = Address::generate();
    let alice = TxContext::new(alice_addr.clone());
    let bob = Address::generate();

    registry.create(&alice, bob.clone()).unwrap();
    let mut ids = Vec::new();
    for amount in [10, 20, 30] {
        let id = registry.ledger().mint_id();
        registry
            .add_item(&alice, &bob, Credits { id: id.clone(), amount })
            .unwrap();
        ids.push(id);
    }

    let (mut bag, token) = registry.reclaim(&alice, &bob).unwrap();
    assert!(!registry.contains(&bob).unwrap());

    // Alice drains the bag into her own account, in reverse order.
    let mut total = 0;
    for id in ids.iter().rev() {
        let ticket = registry
            .ledger()
            .receiving::<Credits>(bag.id(), id)
            .unwrap();
        let credits = bag.claim_item(&token, registry.ledger(), ticket).unwrap();
        total += credits.amount;
        registry
            .ledger()
            .transfer_to_address(&alice_addr, credits)
            .unwrap();
    }
    assert_eq!(total, 60);
    bag.finalize(token).unwrap();

    let held = registry.ledger().account_count(&alice_addr).unwrap();
    assert_eq!(held, 3);
}

#[test]
fn full_workflow_detached_bag_never_returns_to_registry() {
    let registry = Registry::new(MemoryLedger::new());
    let alice = TxContext::new(Address::generate());
    let bob = Address::generate();

    let first = registry.create(&alice, bob.clone()).unwrap();
    let (bag, token) = registry.begin_claim(&TxContext::new(bob.clone())).unwrap();
    assert!(!registry.contains(&bob).unwrap());

    // A new create makes a different bag with a fresh identity; the
    // detached one stays with the session until finalized.
    let second = registry.create(&alice, bob.clone()).unwrap();
    assert_ne!(first, second);
    assert_eq!(registry.summary(&bob).unwrap().id, second);
    assert_eq!(bag.id(), &first);

    bag.finalize(token).unwrap();
    assert_eq!(registry.summary(&bob).unwrap().id, second);
    assert_ne!(registry.ledger().new_identity().unwrap(), second);
}
