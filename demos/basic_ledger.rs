//! Basic ledger usage example

use snapshot_ledger::utils::{SharedLedger, StrictLedgerValidator};
use snapshot_ledger::{Ledger, LedgerError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧾 Snapshot Ledger - Basic Example\n");

    // 1. Fund some accounts in the genesis block
    println!("📦 Writing genesis balances...");
    let mut ledger = Ledger::new();
    ledger.set("Alice", 100)?;
    ledger.set("Bob", 50)?;
    print_block(&ledger, 0)?;

    // 2. Seal genesis and work on block 1
    println!("⛓️  Advancing to block {}...", ledger.advance());
    ledger.set("Alice", 70)?;
    ledger.set("Charlie", 30)?;
    print_block(&ledger, 1)?;

    // 3. Block 2 with a transfer
    println!("⛓️  Advancing to block {}...", ledger.advance());
    ledger.set("Bob", 30)?;
    ledger.set("Daniel", 20)?;
    let receipt = ledger.transfer("Alice", "Daniel", 30)?;
    println!(
        "  ✓ Transfer {}: {} → {} ({}), balances now {} / {}",
        receipt.id,
        receipt.source,
        receipt.destination,
        receipt.amount,
        receipt.source_balance,
        receipt.destination_balance
    );
    print_block(&ledger, 2)?;

    // 4. Rejected operations leave the ledger untouched
    println!("🚫 Attempting invalid operations...");
    for result in [
        ledger.transfer("Alice", "Bob", -25).map(|_| ()),
        ledger.transfer("Alice", "Bob", 1_000).map(|_| ()),
        ledger.get("Alice", 99).map(|_| ()),
    ] {
        if let Err(e) = result {
            println!("  ✗ {}", e);
        }
    }
    println!();

    // 5. History of a single account
    println!("📈 Alice over time:");
    for (height, balance) in ledger.history("Alice") {
        println!("  block {}: {}", height, balance);
    }
    println!();

    let report = ledger.validate_integrity();
    println!(
        "🔍 Integrity: valid = {}, blocks = {}, supply = {}",
        report.is_valid, report.block_count, report.total_supply
    );
    println!();

    // 6. Shared handle with a stricter validator
    println!("🔒 Shared ledger with strict validation...");
    let shared = SharedLedger::with_validator(Box::new(StrictLedgerValidator));
    shared.set("treasury", 1_000)?;
    shared.transfer("treasury", "ops-team", 250)?;
    match shared.transfer("treasury", "ops team", 1) {
        Err(LedgerError::Validation(msg)) => println!("  ✗ {}", msg),
        other => println!("  unexpected: {:?}", other),
    }
    println!(
        "  treasury = {}, ops-team = {}",
        shared.get("treasury", 0)?,
        shared.get("ops-team", 0)?
    );

    Ok(())
}

fn print_block(ledger: &Ledger, height: usize) -> Result<(), LedgerError> {
    let block = ledger.block(height)?;
    for (account, balance) in block.balances() {
        println!("  {:>8}: {}", account, balance);
    }
    println!();
    Ok(())
}
