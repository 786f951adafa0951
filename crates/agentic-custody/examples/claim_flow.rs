//! Claim Flow — stage items for a recipient, claim them, finalize the bag.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example claim_flow -p agentic-custody

use agentic_custody::host::{Item, MemoryLedger, TxContext};
use agentic_custody::id::{Address, ObjectId};
use agentic_custody::registry::Registry;

#[derive(Debug)]
struct Document {
    id: ObjectId,
    title: String,
}

impl Item for Document {
    fn id(&self) -> ObjectId {
        self.id.clone()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let registry = Registry::new(MemoryLedger::new());
    let alice = TxContext::new(Address::generate());
    let bob_addr = Address::generate();
    let bob = TxContext::new(bob_addr.clone());

    println!("Depositor: {}", alice.sender());
    println!("Recipient: {}", bob_addr);
    println!();

    // ── 1. Create a bag for Bob and stage two documents ─────────────────────
    //
    // Alice owns the bag. Only she may add to it, redirect it, or take it back.
    let bag_id = registry.create(&alice, bob_addr.clone())?;
    for title in ["quarterly-report.pdf", "signing-keys.tar"] {
        let doc = Document {
            id: registry.ledger().mint_id(),
            title: title.to_string(),
        };
        registry.add_item(&alice, &bob_addr, doc)?;
    }

    let summary = registry.summary(&bob_addr)?;
    println!("Bag {bag_id} staged:");
    println!("{}", summary.to_json_pretty()?);
    println!();

    // ── 2. Bob begins a claim ───────────────────────────────────────────────
    //
    // The bag leaves the registry together with a token bound to it.
    let (mut bag, token) = registry.begin_claim(&bob)?;
    println!("Claim session open, {} items pending", bag.len());

    // ── 3. Claim items one at a time ────────────────────────────────────────
    let ids: Vec<ObjectId> = bag.pending_items().cloned().collect();
    for id in ids {
        let ticket = registry.ledger().receiving::<Document>(bag.id(), &id)?;
        let doc = bag.claim_item(&token, registry.ledger(), ticket)?;
        println!("  claimed {} ({} left)", doc.title, bag.len());
    }

    // ── 4. Finalize the empty bag ───────────────────────────────────────────
    bag.finalize(token)?;
    println!();
    println!("Bag finalized; registry empty: {}", registry.is_empty()?);

    Ok(())
}
