//! SIGIL — Tamper-Evident Receipts — Demo CLI
//!
//! Runs one or all of the end-to-end scenarios against an in-memory
//! document store.  Each scenario uses the real SIGIL components (issuer,
//! store, verification service) — the only stand-in is the store backend.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- issue-verify
//!   cargo run -p demo -- tampered-price
//!   cargo run -p demo -- reordered-items
//!   cargo run -p demo -- forged-hash
//!   cargo run -p demo -- unknown-id

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use sigil_contracts::{ReceiptDraft, ReceiptItem, SigilError, SigilResult, Verdict};
use sigil_core::{ReceiptIssuer, ServiceConfig};
use sigil_seal::{compute_receipt_hash, NumericPolicy};
use sigil_store::InMemoryDocumentStore;
use sigil_verify::VerificationService;

// ── CLI definition ────────────────────────────────────────────────────────────

/// SIGIL — tamper-evident receipt sealing demo.
///
/// Each subcommand issues a receipt into an in-memory store, optionally
/// tampers with the stored document through the store's direct write path,
/// and then runs verification to show the resulting verdict.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "SIGIL tamper-evident receipt demo",
    long_about = "Runs SIGIL receipt scenarios showing canonicalization,\n\
                  salted SHA-256 sealing, checksum binding, and tamper detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all scenarios in sequence.
    RunAll,
    /// Issue a receipt, fetch it back, verify it (authentic).
    IssueVerify,
    /// Change a stored item price, then verify (hash mismatch).
    TamperedPrice,
    /// Reorder the stored items array, then verify (still authentic).
    ReorderedItems,
    /// Re-derive the hash over tampered data but keep the old checksum
    /// (checksum mismatch).
    ForgedHash,
    /// Verify an identifier that was never issued (not found).
    UnknownId,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::IssueVerify => issue_verify(),
        Command::TamperedPrice => tampered_price(),
        Command::ReorderedItems => reordered_items(),
        Command::ForgedHash => forged_hash(),
        Command::UnknownId => unknown_id(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> SigilResult<()> {
    issue_verify()?;
    tampered_price()?;
    reordered_items()?;
    forged_hash()?;
    unknown_id()?;
    Ok(())
}

// ── Shared fixtures ───────────────────────────────────────────────────────────

const DEMO_CONFIG: &str = include_str!("../config.toml");

fn sample_draft() -> ReceiptDraft {
    let items = vec![
        ReceiptItem { name: "Widget".to_string(), quantity: 2.0, price: 9.99 },
        ReceiptItem { name: "Gadget".to_string(), quantity: 1.0, price: 4.50 },
    ];
    let mut draft = ReceiptDraft {
        customer_name: "Alice Example".to_string(),
        items,
        date: "2024-01-01".to_string(),
        currency: "USD".to_string(),
        total: 0.0,
    };
    draft.total = draft.computed_total();
    draft
}

/// One store shared by the issuer and the verification service, the way a
/// deployment shares one document database.
fn pipeline() -> (InMemoryDocumentStore, ReceiptIssuer, VerificationService) {
    let store = InMemoryDocumentStore::new();
    let issuer = ReceiptIssuer::new(Box::new(store.clone()));
    let service = VerificationService::new(Box::new(store.clone()));
    (store, issuer, service)
}

fn print_verdict(label: &str, verdict: Verdict) {
    let text = match verdict {
        Verdict::Verified => "VERIFIED — record is intact",
        Verdict::HashMismatch => "HASH MISMATCH — protected data was modified",
        Verdict::ChecksumMismatch => "CHECKSUM MISMATCH — envelope does not bind together",
    };
    println!("  [{label}] {text}");
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn issue_verify() -> SigilResult<()> {
    println!("Scenario: issue and verify");

    let config = ServiceConfig::from_toml_str(DEMO_CONFIG)?;
    let (_store, issuer, service) = pipeline();

    let sealed = issuer.issue(sample_draft(), "demo-user")?;
    println!("  issued   {}", sealed.receipt.id);
    println!("  hash     {}", sealed.hash);
    println!("  checksum {}", sealed.integrity_checksum);
    println!("  verify @ {}", config.verification_url(sealed.receipt.id.as_str()));

    let outcome = service.verify(sealed.receipt.id.as_str())?;
    print_verdict("fresh record", outcome.verification.verdict());
    println!();
    Ok(())
}

fn tampered_price() -> SigilResult<()> {
    println!("Scenario: tampered price");

    let (store, issuer, service) = pipeline();
    let sealed = issuer.issue(sample_draft(), "demo-user")?;
    let id = sealed.receipt.id.as_str();

    // Direct write path: the store cannot stop this, only make it evident.
    let mut doc = fetch(&store, id)?;
    doc["items"][0]["price"] = json!(19.99);
    store.overwrite(id, doc)?;
    println!("  stored price changed 9.99 -> 19.99 behind the issuer's back");

    let outcome = service.verify(id)?;
    print_verdict("tampered record", outcome.verification.verdict());
    println!();
    Ok(())
}

fn reordered_items() -> SigilResult<()> {
    println!("Scenario: reordered items");

    let (store, issuer, service) = pipeline();
    let sealed = issuer.issue(sample_draft(), "demo-user")?;
    let id = sealed.receipt.id.as_str();

    let mut doc = fetch(&store, id)?;
    doc["items"]
        .as_array_mut()
        .expect("items is an array in a sealed record")
        .reverse();
    store.overwrite(id, doc)?;
    println!("  stored items array reversed (no content change)");

    let outcome = service.verify(id)?;
    print_verdict("reordered record", outcome.verification.verdict());
    println!();
    Ok(())
}

fn forged_hash() -> SigilResult<()> {
    println!("Scenario: forged hash, stale checksum");

    let (store, issuer, service) = pipeline();
    let sealed = issuer.issue(sample_draft(), "demo-user")?;
    let id = sealed.receipt.id.as_str();

    // The salt is public, so an attacker CAN re-derive a matching hash
    // over edited data.  The checksum is the second tripwire.
    let mut doc = fetch(&store, id)?;
    doc["customerName"] = json!("Mallory");
    let forged = compute_receipt_hash(&doc, NumericPolicy::Lenient)?;
    doc["hash"] = json!(forged);
    store.overwrite(id, doc)?;
    println!("  customer renamed and hash re-derived; checksum left behind");

    let outcome = service.verify(id)?;
    print_verdict("forged record", outcome.verification.verdict());
    println!();
    Ok(())
}

fn unknown_id() -> SigilResult<()> {
    println!("Scenario: unknown identifier");

    let (_store, issuer, service) = pipeline();
    issuer.issue(sample_draft(), "demo-user")?;

    match service.verify("RCP-NEVER-ISSUED00") {
        Err(SigilError::NotFound { receipt_id }) => {
            println!("  [{receipt_id}] NOT FOUND — a lookup miss, not a tampering verdict");
            println!();
            Ok(())
        }
        Ok(_) => Err(SigilError::Store {
            reason: "expected a NotFound error for an unissued id".to_string(),
        }),
        Err(other) => Err(other),
    }
}

/// Fetch a document the scenarios are about to tamper with.
fn fetch(store: &InMemoryDocumentStore, id: &str) -> SigilResult<serde_json::Value> {
    use sigil_core::traits::DocumentStore;
    store
        .find_by_receipt_id(id)?
        .ok_or_else(|| SigilError::NotFound { receipt_id: id.to_string() })
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("SIGIL — Tamper-Evident Receipts");
    println!("Demo Scenarios");
    println!("===============================");
    println!();
    println!("Sealing pipeline per receipt:");
    println!("  [1] Draft + caller uid assembled into a record (id, timestamp, metadata)");
    println!("  [2] Protected fields canonicalized (trim, coerce, sort, stable keys)");
    println!("  [3] Salted SHA-256 hash + integrity checksum derived");
    println!("  [4] Sealed record persisted in a single write, locked");
    println!("  [5] Verification re-fetches, re-derives, and compares both digests");
    println!();
}
