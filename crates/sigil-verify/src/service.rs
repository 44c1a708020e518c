//! Digest re-verification of stored receipts.
//!
//! Verification runs in two phases, in the spirit of "validate the shape,
//! then check the semantics":
//!
//! 1. **Structural** — the fetched document is validated against the
//!    sealed-record schema (`schema::validate_stored_record`).
//! 2. **Digest** — the salted hash is recomputed from the record's current
//!    protected fields and compared against the stored `hash`; the
//!    integrity checksum is recomputed from the stored `hash`, id, item
//!    count, and total and compared against the stored value.
//!
//! Both comparisons are reported.  A mismatch is an `Ok` outcome —
//! tampering detected is the system doing its job — while `Err` is
//! reserved for lookups that could not be completed at all.

use serde_json::Value;
use tracing::{debug, warn};

use sigil_contracts::{
    ReceiptVerification, SigilError, SigilResult, VerificationOutcome,
};
use sigil_core::traits::DocumentStore;
use sigil_seal::{coerce_numeric, compute_integrity_checksum, compute_receipt_hash, NumericPolicy};

use crate::schema::validate_stored_record;

/// Recompute the salted digest over `record`'s protected fields and
/// compare it to `stored_hash`.
///
/// Exact string equality on the hex form; any single-bit difference in any
/// protected field yields `false`.  The comparison is not constant-time —
/// no secret is involved, only a public integrity value.
///
/// # Errors
///
/// Propagates `MalformedReceipt`/`Digest` when the record cannot be
/// canonicalized, which callers must surface as "could not check", never
/// as a negative verdict.
pub fn verify_receipt_hash(
    record: &Value,
    stored_hash: &str,
    policy: NumericPolicy,
) -> SigilResult<bool> {
    let recomputed = compute_receipt_hash(record, policy)?;
    Ok(recomputed == stored_hash)
}

/// The verification entry point: receipt id in, verdict plus record out.
///
/// Fetches fresh from the store on every call — never a cached copy — and
/// never mutates what it reads.  Verification is idempotent: repeated
/// calls over the same stored state always agree.
pub struct VerificationService {
    store: Box<dyn DocumentStore>,
    policy: NumericPolicy,
}

impl VerificationService {
    /// Create a service with the lenient numeric policy.
    ///
    /// Lenient is the read-path default because legacy documents may hold
    /// numerics as strings; strict verification of such a record would
    /// report "could not check" for receipts that were validly issued.
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store, policy: NumericPolicy::Lenient }
    }

    /// Create a service with an explicit numeric policy.
    pub fn with_policy(store: Box<dyn DocumentStore>, policy: NumericPolicy) -> Self {
        Self { store, policy }
    }

    /// Verify the receipt with the given id against its stored digests.
    ///
    /// # Errors
    ///
    /// - `NotFound` — no record matches the id (a lookup miss, not a
    ///   tampering signal)
    /// - `StoreInconsistent` — more than one record matches
    /// - `MalformedReceipt` / `Digest` — the record could not be checked
    ///
    /// A digest mismatch is NOT an error: it comes back as an `Ok`
    /// outcome whose report says which comparison failed.
    pub fn verify(&self, receipt_id: &str) -> SigilResult<VerificationOutcome> {
        debug!(receipt_id, "verifying receipt");

        let record = self
            .store
            .find_by_receipt_id(receipt_id)?
            .ok_or_else(|| SigilError::NotFound { receipt_id: receipt_id.to_string() })?;

        validate_stored_record(&record)?;

        // Schema validation guarantees these fields exist with the right
        // types; the fallbacks below are unreachable belt-and-braces.
        let stored_hash = field_str(&record, "hash")?.to_string();
        let stored_checksum = field_str(&record, "integrityChecksum")?.to_string();
        let id = field_str(&record, "id")?.to_string();
        let item_count = record
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        let total = coerce_numeric(
            record.get("total").unwrap_or(&Value::Null),
            "total",
            self.policy,
        )?;

        let hash_matches = verify_receipt_hash(&record, &stored_hash, self.policy)?;

        // The checksum binds the *stored* hash — not the recomputed one —
        // to the summary fields, exactly as it was derived at creation.
        let expected_checksum =
            compute_integrity_checksum(&stored_hash, &id, item_count, total);
        let checksum_matches = expected_checksum == stored_checksum;

        let verification = ReceiptVerification { hash_matches, checksum_matches };

        if verification.is_authentic() {
            debug!(receipt_id = %id, "receipt verified");
        } else {
            warn!(
                receipt_id = %id,
                hash_matches,
                checksum_matches,
                "receipt failed verification"
            );
        }

        Ok(VerificationOutcome { receipt_id: id, verification, record })
    }
}

fn field_str<'a>(record: &'a Value, key: &str) -> SigilResult<&'a str> {
    record.get(key).and_then(Value::as_str).ok_or_else(|| SigilError::MalformedReceipt {
        reason: format!("stored record has no string field '{key}'"),
    })
}
