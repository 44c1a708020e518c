//! Salted digest derivation and the secondary integrity checksum.
//!
//! Hash input layout (bytes, in order):
//!   1. `TAMPER_SALT` as UTF-8 bytes
//!   2. canonical receipt bytes (see `canonical`)
//!   3. `TAMPER_SALT` again
//!
//! The checksum input is the JSON document
//! `{"receiptHash":…,"receiptId":…,"itemCount":…,"totalAmount":…}` in
//! exactly that key order, unsalted.  Every byte that contributes to either
//! digest is listed here so nothing is accidentally omitted.

use serde::Serialize;
use sha2::{Digest, Sha256};
use serde_json::Value;

use sigil_contracts::SigilResult;

use crate::canonical::{canonicalize, CanonicalNumber, NumericPolicy};

/// The fixed salt wrapped around the canonical bytes before hashing.
///
/// This is NOT a secret key.  It is a static, build-time constant that
/// raises the cost of precomputed dictionary attacks against the hash
/// space; it provides no confidentiality, and anyone with this source can
/// recompute any receipt's hash.  Tamper-evidence comes from comparing the
/// recomputed digest against the independently stored one, not from the
/// salt being unknown.
pub const TAMPER_SALT: &str = "RECEIPT_TAMPER_PROOF_2024";

/// SHA-256 over `salt || bytes || salt`, as lowercase 64-char hex.
pub fn salted_digest(bytes: &[u8], salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(bytes);
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonicalize `record`'s protected fields and digest them under
/// [`TAMPER_SALT`].
///
/// This is the value persisted as `hash` at creation and recomputed at
/// verification.  Determinism of the canonical form makes the composition
/// a pure function of the protected field values.
///
/// # Errors
///
/// Propagates `MalformedReceipt` from canonicalization and `Digest` when
/// canonical bytes cannot be produced.
pub fn compute_receipt_hash(record: &Value, policy: NumericPolicy) -> SigilResult<String> {
    let canonical = canonicalize(record, policy)?;
    Ok(salted_digest(&canonical, TAMPER_SALT))
}

// Declaration order is the serialized key order — the fixed binding layout
// the stored checksums were derived under.  Do not reorder.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChecksumBinding<'a> {
    receipt_hash: &'a str,
    receipt_id: &'a str,
    item_count: usize,
    total_amount: CanonicalNumber,
}

/// Derive the secondary integrity checksum binding `hash` to coarse
/// summary statistics of the receipt it belongs to.
///
/// A forged `(data, hash)` pair copied from elsewhere does not satisfy
/// this checksum unless the item count and total also match — and a hash
/// recomputed over tampered data fails it outright, because the stored
/// checksum still commits to the original hash.  Unsalted by design: the
/// primary hash inside the binding already carries the salt.
///
/// # Panics
///
/// Panics if the binding cannot be serialized to JSON — which cannot
/// happen for this struct of strings and finite numbers.
pub fn compute_integrity_checksum(
    hash: &str,
    receipt_id: &str,
    item_count: usize,
    total: f64,
) -> String {
    let binding = ChecksumBinding {
        receipt_hash: hash,
        receipt_id,
        item_count,
        total_amount: CanonicalNumber(total),
    };
    let bytes =
        serde_json::to_vec(&binding).expect("checksum binding must always serialize to JSON");

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}
