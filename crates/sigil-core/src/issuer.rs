//! The receipt issuance pipeline.
//!
//! Creation is the only moment a receipt's digests are ever computed for
//! persistence:
//!
//!   draft → record assembly → canonicalize → hash → checksum → insert
//!
//! The digests are derived from the exact in-memory record handed to the
//! store in the same call, so there is no read-modify-write gap in which
//! data and envelope could diverge.  Any canonicalization or digest error
//! aborts the whole operation before the store is touched.

use chrono::Utc;
use tracing::{debug, info};

use sigil_contracts::{
    receipt::{RECEIPT_VERSION, SECURITY_LEVEL},
    Receipt, ReceiptDraft, ReceiptId, SealedReceipt, SigilError, SigilResult,
};
use sigil_seal::{compute_integrity_checksum, compute_receipt_hash, NumericPolicy};

use crate::traits::DocumentStore;

/// Issues sealed receipts against a document store.
///
/// Construct once and share; issuance is stateless apart from the store
/// handle.
pub struct ReceiptIssuer {
    store: Box<dyn DocumentStore>,
}

impl ReceiptIssuer {
    /// Create an issuer writing to the given store.
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Seal and persist a receipt.
    ///
    /// `uid` is the caller identity from the external identity provider;
    /// it is stamped onto the receipt and covered by the hash.  The
    /// draft's `total` is trusted as submitted — it is protected by the
    /// digest but never recomputed from the items.
    ///
    /// # Pipeline
    ///
    /// 1. Assemble the full record: generated id, uid, `createdAt = now`,
    ///    fixed `version`/`tamperProof` metadata.
    /// 2. Serialize to the stored-document JSON form.
    /// 3. Compute the salted hash over the canonical protected fields
    ///    (strict numeric policy — new receipts carry real numbers).
    /// 4. Compute the integrity checksum binding hash, id, item count,
    ///    and total.
    /// 5. Insert the sealed record (`locked = true`).
    ///
    /// # Errors
    ///
    /// `MalformedReceipt` / `Digest` if the record cannot be sealed, and
    /// `Store` if the insert fails.  In every error case nothing has been
    /// persisted.
    pub fn issue(&self, draft: ReceiptDraft, uid: &str) -> SigilResult<SealedReceipt> {
        let receipt = Receipt {
            id: ReceiptId::generate(),
            customer_name: draft.customer_name,
            items: draft.items,
            date: draft.date,
            currency: draft.currency,
            total: draft.total,
            user_id: uid.to_string(),
            created_at: Utc::now(),
            version: RECEIPT_VERSION.to_string(),
            tamper_proof: true,
        };

        debug!(
            receipt_id = %receipt.id,
            item_count = receipt.items.len(),
            "sealing receipt"
        );

        let record = serde_json::to_value(&receipt).map_err(|e| SigilError::Digest {
            reason: format!("receipt record serialization failed: {e}"),
        })?;

        let hash = compute_receipt_hash(&record, NumericPolicy::Strict)?;
        let integrity_checksum = compute_integrity_checksum(
            &hash,
            receipt.id.as_str(),
            receipt.items.len(),
            receipt.total,
        );

        let sealed = SealedReceipt {
            receipt,
            hash,
            integrity_checksum,
            locked: true,
            security_level: SECURITY_LEVEL.to_string(),
        };

        let doc_id = self.store.insert(&sealed)?;

        info!(
            receipt_id = %sealed.receipt.id,
            doc_id = %doc_id.0,
            hash = %sealed.hash,
            "receipt sealed and persisted"
        );

        Ok(sealed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use sigil_contracts::{DocId, ReceiptItem, SealedReceipt, SigilError, SigilResult};
    use sigil_seal::{compute_receipt_hash, NumericPolicy};

    use crate::traits::DocumentStore;

    use super::ReceiptIssuer;

    // ── Mock store ───────────────────────────────────────────────────────────

    /// Records every insert for later inspection.
    struct MockStore {
        inserted: Arc<Mutex<Vec<Value>>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self { inserted: Arc::new(Mutex::new(vec![])) }
        }
    }

    impl DocumentStore for MockStore {
        fn insert(&self, record: &SealedReceipt) -> SigilResult<DocId> {
            let value = serde_json::to_value(record).unwrap();
            self.inserted.lock().unwrap().push(value);
            Ok(DocId::new())
        }

        fn find_by_receipt_id(&self, _receipt_id: &str) -> SigilResult<Option<Value>> {
            Ok(None)
        }
    }

    fn sample_draft() -> sigil_contracts::ReceiptDraft {
        sigil_contracts::ReceiptDraft {
            customer_name: "Alice".to_string(),
            items: vec![ReceiptItem { name: "Widget".to_string(), quantity: 2.0, price: 9.99 }],
            date: "2024-01-01".to_string(),
            currency: "USD".to_string(),
            total: 19.98,
        }
    }

    // ── Tests ────────────────────────────────────────────────────────────────

    #[test]
    fn issue_persists_exactly_one_sealed_document() {
        let store = MockStore::new();
        let inserted = store.inserted.clone();
        let issuer = ReceiptIssuer::new(Box::new(store));

        let sealed = issuer.issue(sample_draft(), "user-1").unwrap();

        let docs = inserted.lock().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], sealed.receipt.id.as_str());
        assert_eq!(docs[0]["hash"], sealed.hash);
        assert_eq!(docs[0]["locked"], true);
        assert_eq!(docs[0]["securityLevel"], "HIGH");
    }

    #[test]
    fn issue_stamps_identity_and_fixed_metadata() {
        let issuer = ReceiptIssuer::new(Box::new(MockStore::new()));
        let sealed = issuer.issue(sample_draft(), "user-42").unwrap();

        assert_eq!(sealed.receipt.user_id, "user-42");
        assert_eq!(sealed.receipt.version, "1.0");
        assert!(sealed.receipt.tamper_proof);
        assert!(sealed.locked);
        assert_eq!(sealed.hash.len(), 64);
        assert_eq!(sealed.integrity_checksum.len(), 64);
    }

    #[test]
    fn persisted_record_reverifies_against_its_own_hash() {
        let store = MockStore::new();
        let inserted = store.inserted.clone();
        let issuer = ReceiptIssuer::new(Box::new(store));

        let sealed = issuer.issue(sample_draft(), "user-1").unwrap();

        // Recompute from the document as persisted: the envelope fields
        // ride along but are ignored by canonicalization.
        let stored = inserted.lock().unwrap()[0].clone();
        let recomputed = compute_receipt_hash(&stored, NumericPolicy::Strict).unwrap();
        assert_eq!(recomputed, sealed.hash);
    }

    #[test]
    fn non_finite_draft_numerics_abort_without_persisting() {
        let store = MockStore::new();
        let inserted = store.inserted.clone();
        let issuer = ReceiptIssuer::new(Box::new(store));

        let mut draft = sample_draft();
        draft.total = f64::NAN;

        let result = issuer.issue(draft, "user-1");

        assert!(matches!(result, Err(SigilError::MalformedReceipt { .. })));
        assert!(inserted.lock().unwrap().is_empty(), "nothing may be persisted on error");
    }

    #[test]
    fn issued_receipts_get_distinct_ids() {
        let issuer = ReceiptIssuer::new(Box::new(MockStore::new()));
        let a = issuer.issue(sample_draft(), "user-1").unwrap();
        let b = issuer.issue(sample_draft(), "user-1").unwrap();
        assert_ne!(a.receipt.id, b.receipt.id);
        // Same payload, different id and timestamp: different digests.
        assert_ne!(a.hash, b.hash);
    }
}
